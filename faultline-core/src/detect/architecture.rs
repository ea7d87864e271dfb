// Architecture priority cascade.
//
// Rules are evaluated top to bottom; the first predicate that holds fixes
// the architecture type, confidence and evidence. Unknown is the fallback.

use tracing::{debug, instrument};

use crate::config::DetectionSection;
use crate::types::{
    ArchitectureDetection, ArchitectureType, DatabaseDetection, FrameworkCategory, FrameworkDetection,
    TechStack,
};

use super::database::{detect_database, detect_orm};
use super::evidence::{EvidenceIndex, basename};
use super::framework::detect_frameworks;

/// Everything a cascade predicate may look at.
#[derive(Debug)]
pub struct DetectionContext<'a> {
    pub index: &'a EvidenceIndex,
    pub frameworks: Vec<FrameworkDetection>,
    pub database: Option<DatabaseDetection>,
    pub orm: Option<String>,
}

impl<'a> DetectionContext<'a> {
    /// Run framework, database and ORM scoring over `index`.
    pub fn new(index: &'a EvidenceIndex, config: &DetectionSection) -> Self {
        Self {
            index,
            frameworks: detect_frameworks(index, config),
            database: detect_database(index, config),
            orm: detect_orm(index, config),
        }
    }

    pub fn primary(&self) -> Option<&FrameworkDetection> {
        self.frameworks.first()
    }

    fn primary_is(&self, categories: &[FrameworkCategory]) -> bool {
        self.primary().is_some_and(|f| categories.contains(&f.category))
    }
}

/// One cascade entry.
#[derive(Debug, Clone, Copy)]
pub struct ArchitectureRule {
    pub name: &'static str,
    pub architecture_type: ArchitectureType,
    pub confidence: f64,
    pub evidence: &'static str,
    pub predicate: fn(&DetectionContext<'_>) -> bool,
}

pub const UNKNOWN_CONFIDENCE: f64 = 0.3;
pub const UNKNOWN_EVIDENCE: &str = "Could not determine architecture type";

/// Priority order is significant.
pub static ARCHITECTURE_RULES: &[ArchitectureRule] = &[
    ArchitectureRule {
        name: "microservices",
        architecture_type: ArchitectureType::Microservices,
        confidence: 0.85,
        evidence: "Multiple service directories detected",
        predicate: is_microservices,
    },
    ArchitectureRule {
        name: "mobile",
        architecture_type: ArchitectureType::StaticSpa,
        confidence: 0.9,
        evidence: "Mobile framework detected",
        predicate: is_mobile,
    },
    ArchitectureRule {
        name: "desktop",
        architecture_type: ArchitectureType::StaticSpa,
        confidence: 0.9,
        evidence: "Desktop framework detected",
        predicate: is_desktop,
    },
    ArchitectureRule {
        name: "cli_tool",
        architecture_type: ArchitectureType::CliTool,
        confidence: 0.8,
        evidence: "CLI patterns detected",
        predicate: is_cli_tool,
    },
    ArchitectureRule {
        name: "library",
        architecture_type: ArchitectureType::Library,
        confidence: 0.75,
        evidence: "Library structure detected",
        predicate: is_library,
    },
    ArchitectureRule {
        name: "graphql",
        architecture_type: ArchitectureType::GraphqlApi,
        confidence: 0.85,
        evidence: "GraphQL schema/resolvers detected",
        predicate: is_graphql,
    },
    ArchitectureRule {
        name: "full_stack",
        architecture_type: ArchitectureType::FullStack,
        confidence: 0.9,
        evidence: "Full-stack framework detected",
        predicate: is_full_stack,
    },
    ArchitectureRule {
        name: "ssr_app",
        architecture_type: ArchitectureType::SsrApp,
        confidence: 0.85,
        evidence: "SSR framework detected",
        predicate: is_ssr_app,
    },
    ArchitectureRule {
        name: "backend_api",
        architecture_type: ArchitectureType::BackendApi,
        confidence: 0.85,
        evidence: "Backend framework detected",
        predicate: is_backend_api,
    },
    ArchitectureRule {
        name: "static_spa",
        architecture_type: ArchitectureType::StaticSpa,
        confidence: 0.8,
        evidence: "Frontend framework detected",
        predicate: is_static_spa,
    },
];

// ── Predicates ─────────────────────────────────────────────────────

const SERVICE_DIRS: &[&str] = &["/services/", "/apps/", "/packages/"];
const CLI_MARKERS: &[&str] = &["/cli.py", "/main.py", "/__main__.py", "/cmd/", "/bin/", "/scripts/"];
const CLI_LIBRARIES: &[&str] = &["click", "argparse", "typer", "commander", "yargs", "clap", "cobra"];
const PACKAGE_MANIFESTS: &[&str] = &["setup.py", "pyproject.toml", "package.json", "cargo.toml"];
const PACKAGE_ENTRIES: &[&str] = &["__init__.py", "index.ts", "index.js", "lib.rs"];
const APP_ENTRIES: &[&str] = &["main.py", "app.py", "server.js", "index.html"];
const GRAPHQL_LIBRARIES: &[&str] = &["graphql", "apollo-server", "@apollo/server", "type-graphql"];
const FULLSTACK_API_DIRS: &[&str] = &["/pages/api/", "/app/api/", "/routes/api/"];
const SSR_MARKERS: &[&str] = &["getserversideprops", "getstaticprops", "getinitialprops"];
const BACKEND_DIRS: &[&str] = &["/routes/", "/controllers/", "/handlers/", "/api/", "/endpoints/", "/services/"];
const API_ROUTE_DIRS: &[&str] = &["/api/", "/routes/", "/controllers/", "/endpoints/", "/handlers/"];
const FRONTEND_EXTENSIONS: &[&str] = &[".tsx", ".jsx", ".vue", ".svelte"];

fn is_microservices(ctx: &DetectionContext<'_>) -> bool {
    let idx = ctx.index;
    let service_dirs = SERVICE_DIRS
        .iter()
        .filter(|dir| idx.count_paths(|p| p.contains(*dir)) > 3)
        .count();
    let has_proto = idx.any_path(|p| p.ends_with(".proto"));
    let has_compose = idx.any_path(|p| p.contains("docker-compose"));
    let dockerfiles = idx.count_paths(|p| basename(p).contains("dockerfile"));

    service_dirs >= 2 || (has_proto && has_compose) || dockerfiles > 1
}

fn is_mobile(ctx: &DetectionContext<'_>) -> bool {
    ctx.primary_is(&[FrameworkCategory::Mobile])
        || ["app.json", "metro.config.js", "pubspec.yaml"]
            .iter()
            .any(|f| ctx.index.has_root_file(f))
}

fn is_desktop(ctx: &DetectionContext<'_>) -> bool {
    ctx.primary_is(&[FrameworkCategory::Desktop])
        || ["electron-builder.json", "tauri.conf.json"]
            .iter()
            .any(|f| ctx.index.has_root_file(f))
}

fn is_cli_tool(ctx: &DetectionContext<'_>) -> bool {
    let has_structure = ctx.index.any_path(|p| CLI_MARKERS.iter().any(|m| p.contains(m)));
    let has_library = CLI_LIBRARIES.iter().any(|lib| ctx.index.has_import(lib));
    // A frontend framework alone does not rule out a CLI.
    let web_framework = ctx.primary().is_some() && !ctx.primary_is(&[FrameworkCategory::Frontend]);
    (has_structure || has_library) && !web_framework
}

fn is_library(ctx: &DetectionContext<'_>) -> bool {
    let idx = ctx.index;
    let signals = [
        PACKAGE_MANIFESTS.iter().any(|f| idx.has_basename(f)),
        PACKAGE_ENTRIES.iter().any(|f| idx.has_basename(f)),
        idx.any_path(|p| p.contains("/lib/")),
    ];
    let structure = signals.iter().filter(|s| **s).count() >= 2;
    let no_app_entry = !APP_ENTRIES.iter().any(|f| idx.has_basename(f));
    let exports = idx.has_content("export") || idx.has_content("__all__");

    structure && (no_app_entry || exports) && ctx.frameworks.is_empty()
}

fn is_graphql(ctx: &DetectionContext<'_>) -> bool {
    let idx = ctx.index;
    idx.any_path(|p| p.ends_with(".graphql") || p.ends_with(".gql") || p.contains("/resolvers/"))
        || GRAPHQL_LIBRARIES.iter().any(|lib| idx.has_import(lib))
}

fn is_full_stack(ctx: &DetectionContext<'_>) -> bool {
    if ctx.primary_is(&[FrameworkCategory::Fullstack]) {
        return true;
    }
    ctx.primary_is(&[FrameworkCategory::Frontend])
        && ctx
            .index
            .any_path(|p| FULLSTACK_API_DIRS.iter().any(|d| p.contains(d)))
}

fn is_ssr_app(ctx: &DetectionContext<'_>) -> bool {
    ctx.primary_is(&[FrameworkCategory::Frontend, FrameworkCategory::Fullstack])
        && SSR_MARKERS.iter().any(|m| ctx.index.has_content(m))
}

fn is_backend_api(ctx: &DetectionContext<'_>) -> bool {
    let idx = ctx.index;
    if ctx.primary().is_none() {
        let dirs = BACKEND_DIRS
            .iter()
            .filter(|d| idx.any_path(|p| p.contains(*d)))
            .count();
        return dirs >= 2;
    }
    let frontend_files = idx.any_path(|p| FRONTEND_EXTENSIONS.iter().any(|ext| p.ends_with(ext)));
    ctx.primary_is(&[FrameworkCategory::Backend]) && !frontend_files
}

fn is_static_spa(ctx: &DetectionContext<'_>) -> bool {
    ctx.primary_is(&[FrameworkCategory::Frontend])
}

// ── Tech stack ─────────────────────────────────────────────────────

const LANGUAGES: &[(&str, &[&str])] = &[
    ("TypeScript", &[".ts", ".tsx"]),
    ("JavaScript", &[".js", ".jsx"]),
    ("Python", &[".py"]),
    ("Go", &[".go"]),
    ("Rust", &[".rs"]),
    ("Java", &[".java"]),
    ("Ruby", &[".rb"]),
];

/// Language with the most files; earlier entries win ties.
fn primary_language(index: &EvidenceIndex) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for (language, extensions) in LANGUAGES {
        let count = index.count_paths(|p| extensions.iter().any(|ext| p.ends_with(ext)));
        if count > 0 && best.is_none_or(|(_, n)| count > n) {
            best = Some((*language, count));
        }
    }
    best.map(|(language, _)| language.to_string())
}

fn build_tech_stack(ctx: &DetectionContext<'_>) -> TechStack {
    TechStack {
        framework: ctx.primary().map(|f| f.name.clone()),
        language: primary_language(ctx.index),
        backend: ctx
            .frameworks
            .iter()
            .find(|f| f.category == FrameworkCategory::Backend)
            .map(|f| f.name.clone()),
        database: ctx.database.as_ref().map(|d| d.name.clone()),
        orm: ctx.orm.clone(),
        has_ssr: is_ssr_app(ctx) || is_full_stack(ctx),
        has_api_routes: ctx
            .index
            .any_path(|p| API_ROUTE_DIRS.iter().any(|d| p.contains(d))),
        is_static: is_static_spa(ctx),
    }
}

// ── Entry point ────────────────────────────────────────────────────

/// First matching rule of the cascade, or `None` for unknown.
pub fn classify(ctx: &DetectionContext<'_>) -> Option<&'static ArchitectureRule> {
    ARCHITECTURE_RULES.iter().find(|rule| {
        let matched = (rule.predicate)(ctx);
        debug!(rule = rule.name, matched, "Architecture rule");
        matched
    })
}

/// Classify a repository from its evidence index.
#[instrument(skip_all, name = "detect_architecture")]
pub fn detect_architecture(index: &EvidenceIndex, config: &DetectionSection) -> ArchitectureDetection {
    let ctx = DetectionContext::new(index, config);

    let (architecture_type, confidence, mut evidence) = match classify(&ctx) {
        Some(rule) => (rule.architecture_type, rule.confidence, vec![rule.evidence.to_string()]),
        None => (
            ArchitectureType::Unknown,
            UNKNOWN_CONFIDENCE,
            vec![UNKNOWN_EVIDENCE.to_string()],
        ),
    };
    if let Some(primary) = ctx.primary() {
        evidence.push(format!("Primary framework: {} ({:.2})", primary.name, primary.confidence));
    }

    let tech_stack = build_tech_stack(&ctx);
    debug!(
        architecture = %architecture_type,
        framework = tech_stack.framework.as_deref(),
        language = tech_stack.language.as_deref(),
        "Architecture detected"
    );

    ArchitectureDetection {
        architecture_type,
        archetype: architecture_type.category(),
        tech_stack,
        confidence,
        evidence,
        frameworks: ctx.frameworks,
        database: ctx.database,
    }
}
