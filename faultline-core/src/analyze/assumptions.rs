// Assumption inference: implicit bets the codebase makes, each graded by
// risk and tied to the layers a stress scenario would violate it through.

#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::types::{Category, Severity};

use super::traits::Analyzer;
use super::{AnalysisInput, EvidenceMap, evidence, strings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub assumption: String,
    pub impact: String,
    pub risk_level: Severity,
    pub confidence: f64,
    pub evidence: EvidenceMap,
    pub mitigation: Vec<String>,
    /// Empty means the assumption is global.
    pub affected_layers: Vec<String>,
}

impl Assumption {
    pub fn is_global(&self) -> bool {
        self.affected_layers.is_empty()
    }

    /// Whether a stress touching `layers` violates this assumption.
    pub fn is_violated_by<S: AsRef<str>>(&self, layers: &[S]) -> bool {
        self.is_global()
            || self
                .affected_layers
                .iter()
                .any(|a| layers.iter().any(|l| l.as_ref() == a))
    }
}

struct Draft {
    assumption: String,
    impact: String,
    risk_level: Severity,
    confidence: f64,
    evidence: EvidenceMap,
    mitigation: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct AssumptionRule {
    pub name: &'static str,
    pub affected_layers: &'static [&'static str],
    infer: fn(&AnalysisInput<'_>) -> Option<Draft>,
}

impl AssumptionRule {
    pub fn evaluate(&self, input: &AnalysisInput<'_>) -> Option<Assumption> {
        let draft = (self.infer)(input)?;
        Some(Assumption {
            assumption: draft.assumption,
            impact: draft.impact,
            risk_level: draft.risk_level,
            confidence: draft.confidence,
            evidence: draft.evidence,
            mitigation: strings(draft.mitigation),
            affected_layers: strings(self.affected_layers),
        })
    }
}

pub static ASSUMPTION_RULES: &[AssumptionRule] = &[
    AssumptionRule { name: "external_backend", affected_layers: &["api", "ui"], infer: external_backend },
    AssumptionRule { name: "data_layer", affected_layers: &["models", "db"], infer: data_layer },
    AssumptionRule { name: "state_management", affected_layers: &["ui", "hooks", "state"], infer: state_management },
    AssumptionRule { name: "no_state_management", affected_layers: &["ui"], infer: no_state_management },
    AssumptionRule { name: "authentication", affected_layers: &["auth", "api"], infer: authentication },
    AssumptionRule { name: "testing", affected_layers: &[], infer: testing },
    AssumptionRule { name: "deployment", affected_layers: &["api", "services"], infer: deployment },
    AssumptionRule { name: "ui_hubs", affected_layers: &["ui", "pages"], infer: ui_hubs },
    AssumptionRule { name: "layer_balance", affected_layers: &["api", "services"], infer: layer_balance },
    AssumptionRule { name: "lockfile", affected_layers: &["utils", "services"], infer: lockfile },
    AssumptionRule { name: "error_handling", affected_layers: &[], infer: error_handling },
];

fn is_server_side(category: Category) -> bool {
    matches!(category, Category::Backend | Category::Fullstack)
}

/// First `(label, markers)` entry with any marker present in a file path.
fn first_marker<'t>(input: &AnalysisInput<'_>, table: &'t [(&'t str, &'t [&'t str])]) -> Option<&'t (&'t str, &'t [&'t str])> {
    table
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| input.any_file_contains(m)))
}

fn top3(files: &[&str]) -> Value {
    json!(files.iter().take(3).collect::<Vec<_>>())
}

// ── 1. External backend ────────────────────────────────────────────

fn external_backend(input: &AnalysisInput<'_>) -> Option<Draft> {
    if input.category() != Category::Frontend {
        return None;
    }
    let api_calls = ["fetch(", "axios", "xmlhttprequest"]
        .iter()
        .any(|p| input.index.has_content(p))
        || input.index.has_import("axios");
    Some(Draft {
        assumption: "Backend logic is external to this repository".into(),
        impact: "Frontend is tightly coupled to external API contracts".into(),
        risk_level: Severity::High,
        confidence: 0.9,
        evidence: evidence([
            ("archetype", json!(input.category())),
            ("backend_layers", json!(false)),
            ("api_calls_detected", json!(api_calls)),
        ]),
        mitigation: &[
            "Implement API client abstraction layer",
            "Add contract testing (e.g., Pact)",
            "Document API dependencies explicitly",
        ],
    })
}

// ── 2. Data layer ──────────────────────────────────────────────────

const DATABASE_PATH_MARKERS: &[(&str, &[&str])] = &[
    ("PostgreSQL", &["postgres", "psycopg"]),
    ("MySQL", &["mysql"]),
    ("MongoDB", &["mongo"]),
    ("SQLite", &["sqlite"]),
];

const ORM_PATH_MARKERS: &[(&str, &[&str])] = &[
    ("SQLAlchemy", &["sqlalchemy"]),
    ("Sequelize", &["sequelize"]),
    ("Prisma", &["prisma"]),
];

fn data_layer(input: &AnalysisInput<'_>) -> Option<Draft> {
    let stack = &input.detection.tech_stack;
    let database = stack
        .database
        .clone()
        .or_else(|| first_marker(input, DATABASE_PATH_MARKERS).map(|(name, _)| (*name).to_string()));
    let orm = stack
        .orm
        .clone()
        .or_else(|| first_marker(input, ORM_PATH_MARKERS).map(|(name, _)| (*name).to_string()));
    let migrations = input.any_file_contains("migration") || input.any_file_contains("migrate");

    let assumption = match (&orm, &database) {
        (Some(orm), _) => format!("Using {orm} ORM for data access"),
        (None, Some(db)) => format!("Using {db} database without ORM abstraction"),
        (None, None) => return None,
    };
    let (impact, risk_level, mitigation): (&str, Severity, &'static [&'static str]) = if migrations {
        (
            "Schema evolution managed through migrations",
            Severity::Medium,
            &["Maintain migration rollback scripts", "Test migrations in staging environment"],
        )
    } else {
        (
            "Database schema changes require coordinated updates",
            Severity::High,
            &[
                "Implement database migration strategy",
                "Add integration tests for data layer",
                "Document schema evolution process",
            ],
        )
    };

    Some(Draft {
        assumption,
        impact: impact.into(),
        risk_level,
        confidence: 0.85,
        evidence: evidence([
            ("database_type", json!(database)),
            ("orm_type", json!(orm)),
            ("migration_files", json!(migrations)),
        ]),
        mitigation,
    })
}

// ── 3. State management ────────────────────────────────────────────

const STATE_LIBRARIES: &[(&str, &[&str], &[&str])] = &[
    ("Redux", &["redux", "@reduxjs/toolkit"], &["store", "redux"]),
    ("Zustand", &["zustand"], &["store"]),
    ("MobX", &["mobx"], &["store"]),
    ("Recoil", &["recoil"], &["atom", "recoil"]),
];

/// State library name and its store files.
fn detect_state<'a>(input: &AnalysisInput<'a>) -> Option<(&'static str, Vec<&'a str>)> {
    let library = STATE_LIBRARIES.iter().find(|(name, imports, _)| {
        input.any_file_contains(&name.to_lowercase()) || imports.iter().any(|i| input.index.has_import(i))
    });
    match library {
        Some((name, _, markers)) => Some((*name, input.files_containing(markers))),
        None if input.any_file_contains("context") && input.any_file_contains("provider") => {
            Some(("React Context", input.files_containing(&["context"])))
        }
        None => None,
    }
}

fn state_management(input: &AnalysisInput<'_>) -> Option<Draft> {
    let (kind, store_files) = detect_state(input)?;
    Some(Draft {
        assumption: format!("Centralized state management using {kind}"),
        impact: "State changes can trigger cascade updates across components".into(),
        risk_level: Severity::Medium,
        confidence: 0.8,
        evidence: evidence([
            ("state_manager", json!(kind)),
            ("store_files", top3(&store_files)),
            ("global_state_files", json!(store_files.len())),
        ]),
        mitigation: &[
            "Implement state normalization",
            "Add selectors to prevent unnecessary re-renders",
            "Document state shape and update patterns",
            "Consider state splitting for performance",
        ],
    })
}

fn no_state_management(input: &AnalysisInput<'_>) -> Option<Draft> {
    let ui = input.layers.files("ui").len();
    if detect_state(input).is_some() || input.category() != Category::Frontend || ui <= 10 {
        return None;
    }
    Some(Draft {
        assumption: "No centralized state management detected".into(),
        impact: "State likely managed via props drilling or local component state".into(),
        risk_level: Severity::High,
        confidence: 0.75,
        evidence: evidence([("ui_components", json!(ui)), ("state_manager", Value::Null)]),
        mitigation: &[
            "Consider adopting Redux, Zustand, or Context API",
            "Audit prop drilling depth",
            "Implement state management for complex flows",
        ],
    })
}

// ── 4. Authentication ──────────────────────────────────────────────

const FIREBASE_MARKERS: &[&str] = &["firebase"];
const AUTH_KINDS: &[(&str, &[&str])] = &[
    ("JWT", &["jwt", "jsonwebtoken"]),
    ("Passport.js", &["passport"]),
    ("OAuth", &["oauth"]),
    ("Custom Auth", &["auth"]),
];

fn authentication(input: &AnalysisInput<'_>) -> Option<Draft> {
    let found = if input.any_file_contains("firebase") && input.any_file_contains("auth") {
        first_marker(input, &AUTH_KINDS[..3])
            .map(|(k, m)| (*k, *m))
            .or(Some(("Firebase Auth", FIREBASE_MARKERS)))
    } else {
        first_marker(input, AUTH_KINDS).map(|(k, m)| (*k, *m))
    };

    if let Some((kind, markers)) = found {
        let mut needles: Vec<&str> = markers.to_vec();
        needles.push("auth");
        let auth_files = input.files_containing(&needles);
        return Some(Draft {
            assumption: format!("Authentication handled via {kind}"),
            impact: "Security model depends on proper auth implementation".into(),
            risk_level: Severity::Critical,
            confidence: 0.85,
            evidence: evidence([
                ("auth_type", json!(kind)),
                ("auth_files", top3(&auth_files)),
                ("middleware_detected", json!(input.any_file_contains("middleware"))),
            ]),
            mitigation: &[
                "Implement comprehensive auth testing",
                "Add security audit for auth flows",
                "Document authentication requirements",
                "Enable MFA/2FA for sensitive operations",
                "Regular security reviews of auth code",
            ],
        });
    }

    is_server_side(input.category()).then(|| Draft {
        assumption: "No authentication layer detected".into(),
        impact: "API endpoints may be unprotected".into(),
        risk_level: Severity::Critical,
        confidence: 0.7,
        evidence: evidence([("auth_files", json!([])), ("middleware_detected", json!(false))]),
        mitigation: &[
            "Implement authentication layer",
            "Add authorization middleware",
            "Audit all endpoints for security",
        ],
    })
}

// ── 5. Testing ─────────────────────────────────────────────────────

const TEST_MARKERS: &[&str] = &[".test.", ".spec.", "_test.", "test_"];
const TEST_FRAMEWORKS: &[(&str, &[&str])] = &[
    ("Jest", &["jest"]),
    ("Pytest", &["pytest", "conftest"]),
    ("Mocha", &["mocha"]),
    ("Vitest", &["vitest"]),
    ("unittest", &["unittest"]),
];

fn testing(input: &AnalysisInput<'_>) -> Option<Draft> {
    let tests = input.files_containing(TEST_MARKERS);
    if tests.is_empty() {
        return Some(Draft {
            assumption: "No testing infrastructure detected".into(),
            impact: "No automated quality assurance".into(),
            risk_level: Severity::Critical,
            confidence: 0.95,
            evidence: evidence([("test_files", json!(0)), ("test_framework", Value::Null)]),
            mitigation: &[
                "Set up a testing framework (Jest, Pytest, etc.)",
                "Add unit tests for critical logic",
                "Implement CI/CD with test gates",
                "Establish testing guidelines",
            ],
        });
    }

    let framework = first_marker(input, TEST_FRAMEWORKS).map_or("Unknown", |(name, _)| *name);
    let ratio = tests.len() as f64 / input.files.len().max(1) as f64;
    let risk_level = if ratio > 0.3 {
        Severity::Low
    } else if ratio > 0.15 {
        Severity::Medium
    } else {
        Severity::High
    };
    let has = |needles: &[&str]| needles.iter().any(|n| input.any_file_contains(n));

    Some(Draft {
        assumption: format!("Testing infrastructure present ({framework})"),
        impact: format!(
            "Test coverage appears {}",
            if risk_level == Severity::Low { "adequate" } else { "insufficient" }
        ),
        risk_level,
        confidence: 0.9,
        evidence: evidence([
            ("test_framework", json!(framework)),
            ("test_files", json!(tests.len())),
            ("test_ratio", json!(format!("{:.1}%", ratio * 100.0))),
            ("has_e2e", json!(has(&["cypress", "playwright", "e2e"]))),
            ("has_integration", json!(has(&["integration"]))),
        ]),
        mitigation: if risk_level == Severity::Low {
            &["Maintain current test coverage", "Add mutation testing for quality assurance"]
        } else {
            &[
                "Increase test coverage to >80%",
                "Add integration tests for critical paths",
                "Implement E2E tests for user flows",
            ]
        },
    })
}

// ── 6. Deployment ──────────────────────────────────────────────────

const DEPLOY_PLATFORMS: &[(&str, &[&str])] = &[
    ("Vercel", &["vercel"]),
    ("Netlify", &["netlify"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Terraform", &["terraform"]),
];
const CI_MARKERS: &[&str] = &[".github/workflows", ".gitlab-ci", "jenkinsfile", ".circleci"];

fn deployment(input: &AnalysisInput<'_>) -> Option<Draft> {
    let containerized = input.any_file_contains("dockerfile") || input.any_file_contains("docker-compose");
    let platform = first_marker(input, DEPLOY_PLATFORMS)
        .map(|(name, _)| *name)
        .or(containerized.then_some("Docker"));
    let has_ci = CI_MARKERS.iter().any(|m| input.any_file_contains(m));

    let Some(platform) = platform else {
        return Some(Draft {
            assumption: "No deployment configuration detected".into(),
            impact: "Manual deployment process, high error risk".into(),
            risk_level: Severity::High,
            confidence: 0.8,
            evidence: evidence([("config_files", json!([])), ("has_ci", json!(has_ci))]),
            mitigation: &[
                "Create deployment configuration",
                "Set up CI/CD pipeline",
                "Document deployment procedures",
                "Implement infrastructure as code",
            ],
        });
    };

    Some(Draft {
        assumption: format!("Deployment configured for {platform}"),
        impact: "Deployment process is codified".into(),
        risk_level: if has_ci { Severity::Low } else { Severity::Medium },
        confidence: 0.85,
        evidence: evidence([
            ("platform", json!(platform)),
            ("has_ci", json!(has_ci)),
            ("containerized", json!(containerized)),
        ]),
        mitigation: if has_ci {
            &["Maintain deployment documentation", "Regular DR testing"]
        } else {
            &[
                "Document deployment process",
                "Add deployment rollback procedures",
                "Implement canary deployments",
            ]
        },
    })
}

// ── 7. UI hubs ─────────────────────────────────────────────────────

const UI_HUB_FAN_IN: usize = 5;

fn ui_hubs(input: &AnalysisInput<'_>) -> Option<Draft> {
    let metrics = input.metrics;
    let hubs: Vec<&str> = input
        .layers
        .files("ui")
        .iter()
        .filter(|f| metrics.fan_in(f) > UI_HUB_FAN_IN)
        .map(String::as_str)
        .collect();
    let max_fan_in = hubs.iter().map(|f| metrics.fan_in(f)).max()?;
    let risk_level = if max_fan_in > 15 {
        Severity::Critical
    } else if max_fan_in > 10 {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(Draft {
        assumption: "UI components act as architectural hubs".into(),
        impact: "Changes to shared UI components have wide blast radius".into(),
        risk_level,
        confidence: 0.8,
        evidence: evidence([
            ("high_fan_in_files", top3(&hubs)),
            ("max_dependencies", json!(max_fan_in)),
            ("hub_count", json!(hubs.len())),
        ]),
        mitigation: &[
            "Refactor god components into smaller pieces",
            "Implement component composition patterns",
            "Add visual regression testing for hub components",
            "Consider micro-frontend architecture",
        ],
    })
}

// ── 8. API/service balance ─────────────────────────────────────────

fn layer_balance(input: &AnalysisInput<'_>) -> Option<Draft> {
    if !is_server_side(input.category()) {
        return None;
    }
    let api = input.layers.files("api").len();
    let services = input.layers.files("services").len();
    if api == 0 || services == 0 {
        return None;
    }
    let ratio = api as f64 / services as f64;
    if (0.5..=1.5).contains(&ratio) {
        return None;
    }

    Some(Draft {
        assumption: "Imbalanced API to Service layer ratio".into(),
        impact: if ratio > 1.5 {
            "Potential tight coupling between layers".into()
        } else {
            "Business logic may be scattered".into()
        },
        risk_level: Severity::Medium,
        confidence: 0.7,
        evidence: evidence([
            ("api_files", json!(api)),
            ("service_files", json!(services)),
            ("ratio", json!(format!("{ratio:.2}"))),
        ]),
        mitigation: &[
            "Audit layer responsibilities",
            "Refactor to balance API and service logic",
            "Implement clear layer boundaries",
            "Add architecture decision records (ADRs)",
        ],
    })
}

// ── 9. Lockfile ────────────────────────────────────────────────────

const LOCKFILES: &[(&str, &str)] = &[
    ("npm", "package-lock.json"),
    ("yarn", "yarn.lock"),
    ("pnpm", "pnpm-lock.yaml"),
    ("poetry", "poetry.lock"),
    ("pipenv", "pipfile.lock"),
    ("composer", "composer.lock"),
    ("cargo", "cargo.lock"),
];

fn lockfile(input: &AnalysisInput<'_>) -> Option<Draft> {
    if let Some((manager, file)) = LOCKFILES.iter().find(|(_, file)| input.index.has_basename(file)) {
        return Some(Draft {
            assumption: format!("Dependencies managed via {manager}"),
            impact: "Reproducible builds enabled".into(),
            risk_level: Severity::Low,
            confidence: 0.95,
            evidence: evidence([("package_manager", json!(manager)), ("lockfile", json!(file))]),
            mitigation: &[
                "Regular dependency updates",
                "Security vulnerability scanning",
                "Audit unused dependencies",
            ],
        });
    }

    let manager = if input.index.has_basename("package.json") {
        Some("npm/yarn")
    } else if input.index.has_basename("requirements.txt") {
        Some("pip")
    } else {
        None
    };
    Some(Draft {
        assumption: "No dependency lockfile detected".into(),
        impact: "Non-reproducible builds, version drift risk".into(),
        risk_level: Severity::High,
        confidence: 0.85,
        evidence: evidence([("package_manager", json!(manager)), ("lockfile", Value::Null)]),
        mitigation: &[
            "Add lockfile (package-lock.json, poetry.lock, etc.)",
            "Commit lockfile to version control",
            "Enable dependency scanning",
        ],
    })
}

// ── 10. Error handling ─────────────────────────────────────────────

fn error_handling(input: &AnalysisInput<'_>) -> Option<Draft> {
    let error_files = input.files_containing(&["error", "exception"]);
    if error_files.is_empty() {
        return None;
    }
    let has = |needles: &[&str]| needles.iter().any(|n| input.any_file_contains(n));
    let logging = has(&["winston", "bunyan", "logging", "logger"]);
    let monitoring = has(&["sentry", "bugsnag", "rollbar"]);

    Some(Draft {
        assumption: "Error handling via custom error handlers".into(),
        impact: "Error tracking and recovery mechanisms present".into(),
        risk_level: if monitoring { Severity::Low } else { Severity::Medium },
        confidence: 0.75,
        evidence: evidence([
            ("error_handlers", top3(&error_files)),
            ("logging_detected", json!(logging)),
            ("monitoring_detected", json!(monitoring)),
        ]),
        mitigation: if monitoring {
            &["Maintain error monitoring alerts", "Regular error pattern analysis"]
        } else {
            &[
                "Implement centralized error logging",
                "Add error monitoring (Sentry, etc.)",
                "Document error recovery procedures",
            ]
        },
    })
}

// ── Analyzer ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AssumptionAnalyzer;

impl Analyzer for AssumptionAnalyzer {
    type Output = Assumption;

    fn name(&self) -> &'static str {
        "assumptions"
    }

    #[instrument(skip_all, name = "assumptions_analyze")]
    fn analyze(&self, input: &AnalysisInput<'_>) -> Vec<Assumption> {
        let found: Vec<Assumption> = ASSUMPTION_RULES
            .iter()
            .filter_map(|rule| rule.evaluate(input))
            .collect();
        debug!(
            count = found.len(),
            critical = found.iter().filter(|a| a.risk_level == Severity::Critical).count(),
            "Assumptions inferred"
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use faultline_graphs::DependencyGraph;

    use super::*;
    use crate::analyze::test_support::Fixture;
    use crate::types::ArchitectureType;

    fn find<'a>(found: &'a [Assumption], prefix: &str) -> Option<&'a Assumption> {
        found.iter().find(|a| a.assumption.starts_with(prefix))
    }

    #[test]
    fn frontend_repo_assumes_external_backend() {
        let fx = Fixture::new(&["src/App.tsx", "src/components/Nav.tsx"], ArchitectureType::StaticSpa);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "Backend logic is external").unwrap();
        assert_eq!(a.risk_level, Severity::High);
        assert_eq!(a.affected_layers, vec!["api", "ui"]);
    }

    #[test]
    fn always_reports_testing_and_lockfile() {
        let fx = Fixture::new(&[], ArchitectureType::Unknown);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let testing = find(&found, "No testing infrastructure").unwrap();
        assert_eq!(testing.risk_level, Severity::Critical);
        assert!(testing.is_global());
        assert!(find(&found, "No dependency lockfile").is_some());
        assert!(find(&found, "No deployment configuration").is_some());
    }

    #[test]
    fn test_ratio_grades_risk() {
        let fx = Fixture::new(
            &["app/x.py", "tests/test_x.py", "conftest.py"],
            ArchitectureType::BackendApi,
        );
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let t = find(&found, "Testing infrastructure present").unwrap();
        assert_eq!(t.assumption, "Testing infrastructure present (Pytest)");
        assert_eq!(t.risk_level, Severity::Low);
    }

    #[test]
    fn backend_without_auth_is_critical() {
        let fx = Fixture::new(&["app/api/users.py"], ArchitectureType::BackendApi);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "No authentication layer").unwrap();
        assert_eq!(a.risk_level, Severity::Critical);

        let fx = Fixture::new(&["app/api/users.py", "app/auth/jwt.py"], ArchitectureType::BackendApi);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "Authentication handled via").unwrap();
        assert_eq!(a.assumption, "Authentication handled via JWT");
        assert_eq!(a.evidence["auth_files"], json!(["app/auth/jwt.py"]));
    }

    #[test]
    fn no_state_management_narrows_layers() {
        let files: Vec<String> = (0..11).map(|i| format!("src/components/C{i}.tsx")).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        let fx = Fixture::new(&refs, ArchitectureType::StaticSpa);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "No centralized state management").unwrap();
        assert_eq!(a.affected_layers, vec!["ui"]);

        let fx = Fixture::new(&["src/store/redux/cart.ts"], ArchitectureType::StaticSpa);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "Centralized state management using Redux").unwrap();
        assert_eq!(a.affected_layers, vec!["ui", "hooks", "state"]);
    }

    #[test]
    fn ui_hub_risk_grading() {
        let mut graph = DependencyGraph::new();
        for i in 0..12 {
            graph.add_import(&format!("src/pages/P{i}.tsx"), "src/components/Button.tsx");
        }
        let fx = Fixture::with_graph(&["src/components/Button.tsx"], ArchitectureType::StaticSpa, &graph);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "UI components act as architectural hubs").unwrap();
        assert_eq!(a.risk_level, Severity::High);
        assert_eq!(a.evidence["max_dependencies"], json!(12));
    }

    #[test]
    fn layer_imbalance() {
        let fx = Fixture::new(
            &["a/api/1.py", "a/api/2.py", "a/api/3.py", "a/api/4.py", "a/services/s.py"],
            ArchitectureType::BackendApi,
        );
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let a = find(&found, "Imbalanced API").unwrap();
        assert_eq!(a.impact, "Potential tight coupling between layers");
    }

    #[test]
    fn lockfile_and_deployment_detected() {
        let fx = Fixture::new(
            &["package.json", "yarn.lock", "Dockerfile", ".github/workflows/ci.yml"],
            ArchitectureType::Unknown,
        );
        let found = AssumptionAnalyzer.analyze(&fx.input());
        assert_eq!(find(&found, "Dependencies managed via").unwrap().assumption, "Dependencies managed via yarn");
        let d = find(&found, "Deployment configured for").unwrap();
        assert_eq!(d.assumption, "Deployment configured for Docker");
        assert_eq!(d.risk_level, Severity::Low);
    }

    #[test]
    fn violation_by_layers() {
        let fx = Fixture::new(&["src/App.tsx"], ArchitectureType::StaticSpa);
        let found = AssumptionAnalyzer.analyze(&fx.input());
        let external = find(&found, "Backend logic is external").unwrap();
        assert!(external.is_violated_by(&["ui"]));
        assert!(!external.is_violated_by(&["models"]));
        let testing = find(&found, "No testing infrastructure").unwrap();
        assert!(testing.is_violated_by::<&str>(&[]));
    }
}
