// Architecture hypotheses: named structural patterns with a confidence.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::types::Category;

use super::traits::Analyzer;
use super::{AnalysisInput, EvidenceMap, evidence, strings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub claim: String,
    pub confidence: f64,
    pub pattern_type: String,
    pub evidence: EvidenceMap,
    pub characteristics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Hypothesis {
    fn new(claim: &str, confidence: f64, pattern_type: &str, evidence: EvidenceMap, characteristics: &[&str]) -> Self {
        Self {
            claim: claim.to_string(),
            confidence,
            pattern_type: pattern_type.to_string(),
            evidence,
            characteristics: strings(characteristics),
            warning: None,
        }
    }

    fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }
}

/// Which repository categories a rule is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisScope {
    FrontendOrFullstack,
    BackendOrFullstack,
    Fullstack,
    Global,
}

impl HypothesisScope {
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::FrontendOrFullstack => matches!(category, Category::Frontend | Category::Fullstack),
            Self::BackendOrFullstack => matches!(category, Category::Backend | Category::Fullstack),
            Self::Fullstack => category == Category::Fullstack,
            Self::Global => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HypothesisRule {
    pub name: &'static str,
    pub scope: HypothesisScope,
    pub infer: fn(&AnalysisInput<'_>) -> Option<Hypothesis>,
}

use HypothesisScope::{BackendOrFullstack, FrontendOrFullstack, Fullstack, Global};

pub static HYPOTHESIS_RULES: &[HypothesisRule] = &[
    HypothesisRule { name: "component_spa", scope: FrontendOrFullstack, infer: component_spa },
    HypothesisRule { name: "atomic_design", scope: FrontendOrFullstack, infer: atomic_design },
    HypothesisRule { name: "hooks_react", scope: FrontendOrFullstack, infer: hooks_react },
    HypothesisRule { name: "feature_slices", scope: FrontendOrFullstack, infer: feature_slices },
    HypothesisRule { name: "layered_n_tier", scope: BackendOrFullstack, infer: layered_n_tier },
    HypothesisRule { name: "mvc", scope: BackendOrFullstack, infer: mvc },
    HypothesisRule { name: "repository", scope: BackendOrFullstack, infer: repository },
    HypothesisRule { name: "cqrs", scope: BackendOrFullstack, infer: cqrs },
    HypothesisRule { name: "separated_full_stack", scope: Fullstack, infer: separated_full_stack },
    HypothesisRule { name: "monorepo", scope: Global, infer: monorepo },
    HypothesisRule { name: "hub_and_spoke", scope: Global, infer: hub_and_spoke },
    HypothesisRule { name: "god_modules", scope: Global, infer: god_modules },
    HypothesisRule { name: "circular_dependencies", scope: Global, infer: circular_dependencies },
    HypothesisRule { name: "serverless", scope: Global, infer: serverless },
    HypothesisRule { name: "event_driven", scope: Global, infer: event_driven },
    HypothesisRule { name: "graphql", scope: Global, infer: graphql },
];

const HUB_FAN_IN: usize = 8;
const COMPONENT_SPA_MIN_UI: usize = 20;

// ── Frontend ───────────────────────────────────────────────────────

fn component_spa(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let ui = input.layers.files("ui");
    (ui.len() > COMPONENT_SPA_MIN_UI).then(|| {
        let hubs: Vec<&String> = input.metrics.hubs.iter().take(3).collect();
        Hypothesis::new(
            "Component-centric frontend SPA",
            0.85,
            "Frontend Architecture",
            evidence([("ui_components", json!(ui.len())), ("dependency_hubs", json!(hubs))]),
            &[
                "Heavy component composition",
                "Modular UI structure",
                "Client-side rendering focus",
            ],
        )
    })
}

const ATOMIC_LEVELS: [&str; 5] = ["atom", "molecule", "organism", "template", "page"];

fn atomic_design(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let mut counts = [0usize; ATOMIC_LEVELS.len()];
    for file in input.layers.files("ui") {
        let lower = file.to_lowercase();
        if let Some(level) = ATOMIC_LEVELS.iter().position(|l| lower.contains(l)) {
            counts[level] += 1;
        }
    }
    let present = counts.iter().filter(|c| **c > 0).count();
    (present >= 3).then(|| {
        Hypothesis::new(
            "Atomic Design methodology",
            0.8,
            "Component Organization",
            evidence([
                ("atoms", json!(counts[0])),
                ("molecules", json!(counts[1])),
                ("organisms", json!(counts[2])),
                ("templates", json!(counts[3])),
                ("pages", json!(counts[4])),
            ]),
            &[
                "Hierarchical component structure",
                "Reusable component library",
                "Design system approach",
            ],
        )
    })
}

fn hooks_react(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let hooks = input.layers.files("hooks");
    let jsx = input.index.any_path(|p| p.ends_with(".tsx") || p.ends_with(".jsx"));
    (!hooks.is_empty() && jsx).then(|| {
        Hypothesis::new(
            "Hooks-based React architecture",
            0.85,
            "Component Pattern",
            evidence([("custom_hooks", json!(hooks.len()))]),
            &[
                "Functional programming approach",
                "Custom hooks for logic reuse",
                "Minimal class components",
            ],
        )
    })
}

fn feature_slices(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let features = input.files_containing(&["features/", "feature/"]);
    (!features.is_empty()).then(|| {
        Hypothesis::new(
            "Feature-based (vertical slice) architecture",
            0.75,
            "Code Organization",
            evidence([("feature_files", json!(features.len()))]),
            &[
                "Features self-contained",
                "Reduces coupling between features",
                "Easier to scale teams",
            ],
        )
    })
}

// ── Backend ────────────────────────────────────────────────────────

fn layered_n_tier(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let api = input.layers.files("api");
    let services = input.layers.files("services");
    (!api.is_empty() && !services.is_empty()).then(|| {
        Hypothesis::new(
            "Layered backend service (N-tier: API -> Services -> Data)",
            0.8,
            "Backend Architecture",
            evidence([("api_files", json!(api.len())), ("service_files", json!(services.len()))]),
            &[
                "Horizontal layer separation",
                "Dependency flow from top to bottom",
                "Business logic in service layer",
            ],
        )
    })
}

fn mvc(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let models = input.files_containing(&["model"]);
    let views = input.files_containing(&["view"]);
    let controllers = input.files_containing(&["controller"]);
    (!models.is_empty() && !controllers.is_empty()).then(|| {
        Hypothesis::new(
            "Model-View-Controller (MVC) pattern",
            0.8,
            "Backend Architecture",
            evidence([
                ("models", json!(models.len())),
                ("views", json!(views.len())),
                ("controllers", json!(controllers.len())),
            ]),
            &[
                "Separation of data and request handling",
                "Traditional web framework pattern",
                "Request-response oriented",
            ],
        )
    })
}

fn repository(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let repos = input.files_containing(&["repository"]);
    (!repos.is_empty()).then(|| {
        Hypothesis::new(
            "Repository pattern for data access",
            0.75,
            "Data Access Pattern",
            evidence([("repository_files", json!(repos.len()))]),
            &[
                "Abstraction over data layer",
                "Testable data access",
                "Decoupled from ORM specifics",
            ],
        )
    })
}

fn cqrs(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let commands = input.files_containing(&["command"]);
    let queries = input.files_containing(&["query", "queries"]);
    (!commands.is_empty() && !queries.is_empty()).then(|| {
        Hypothesis::new(
            "Command Query Responsibility Segregation (CQRS)",
            0.7,
            "Backend Pattern",
            evidence([("command_files", json!(commands.len())), ("query_files", json!(queries.len()))]),
            &[
                "Separate read and write models",
                "Optimized query paths",
                "Event-driven potential",
            ],
        )
    })
}

// ── Full-stack ─────────────────────────────────────────────────────

const FRONTEND_LAYERS: &[&str] = &["ui", "hooks", "pages"];
const BACKEND_LAYERS: &[&str] = &["api", "services", "models", "db"];

fn separated_full_stack(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let present = |names: &[&str]| -> Vec<String> {
        names
            .iter()
            .filter(|n| input.layers.has_files(n))
            .map(|n| (*n).to_string())
            .collect()
    };
    let frontend = present(FRONTEND_LAYERS);
    let backend = present(BACKEND_LAYERS);
    (!frontend.is_empty() && !backend.is_empty()).then(|| {
        Hypothesis::new(
            "Full-stack system with separated frontend and backend",
            0.8,
            "Full-stack Architecture",
            evidence([("frontend_layers", json!(frontend)), ("backend_layers", json!(backend))]),
            &[
                "Independent deployment possible",
                "Clear API contract",
                "Technology flexibility",
            ],
        )
    })
}

fn monorepo(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let configs = input.files_containing(&["lerna.json", "pnpm-workspace", "nx.json", "turbo.json"]);
    (!configs.is_empty()).then(|| {
        Hypothesis::new(
            "Monorepo architecture",
            0.85,
            "Code Organization",
            evidence([("workspace_config", json!(configs))]),
            &[
                "Unified versioning",
                "Shared tooling and dependencies",
                "Cross-project refactoring ease",
            ],
        )
    })
}

// ── Coupling ───────────────────────────────────────────────────────

fn hub_and_spoke(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let metrics = input.metrics;
    let hubs: Vec<&String> = metrics
        .hubs
        .iter()
        .filter(|h| metrics.fan_in(h) > HUB_FAN_IN)
        .collect();
    (!hubs.is_empty()).then(|| {
        Hypothesis::new(
            "Hub-and-spoke dependency pattern",
            0.85,
            "Coupling Pattern",
            evidence([
                ("hub_modules", json!(hubs.len())),
                ("high_centrality_files", json!(hubs.iter().take(3).collect::<Vec<_>>())),
            ]),
            &[
                "Central modules with high fan-in",
                "Risk of bottlenecks",
                "Changes have wide impact",
            ],
        )
        .with_warning("High coupling risk: consider refactoring hubs")
    })
}

fn god_modules(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let gods = &input.metrics.god_modules;
    (!gods.is_empty()).then(|| {
        Hypothesis::new(
            "God object/module anti-pattern detected",
            0.8,
            "Anti-pattern",
            evidence([
                ("god_modules", json!(gods.iter().take(3).collect::<Vec<_>>())),
                ("max_fan_in", json!(input.metrics.max_fan_in)),
            ]),
            &["Modules doing too much", "Low cohesion", "Difficult to maintain and test"],
        )
        .with_warning("Refactor god modules to improve maintainability")
    })
}

fn circular_dependencies(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let cycles = &input.metrics.cycles;
    (!cycles.is_empty()).then(|| {
        Hypothesis::new(
            "Circular dependency pattern detected",
            0.75,
            "Anti-pattern",
            evidence([
                ("cycle_count", json!(cycles.len())),
                ("cycles", json!(cycles.iter().take(3).collect::<Vec<_>>())),
            ]),
            &[
                "Modules depend on each other",
                "Tight coupling",
                "Difficult to test in isolation",
            ],
        )
        .with_warning("Break circular dependencies for better modularity")
    })
}

// ── Modern patterns ────────────────────────────────────────────────

fn serverless(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let cloud = ["aws", "azure", "gcp"].iter().any(|c| input.any_file_contains(c));
    let detected = input.any_file_contains("lambda")
        || input.any_file_contains("serverless")
        || (input.any_file_contains("function") && cloud);
    detected.then(|| {
        Hypothesis::new(
            "Serverless architecture (FaaS)",
            0.75,
            "Modern Architecture",
            evidence([("function_files", json!(input.files_containing(&["lambda", "serverless", "function"]).len()))]),
            &["Function-based deployment", "Event-driven execution", "Auto-scaling"],
        )
    })
}

fn event_driven(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let has = |n: &str| input.any_file_contains(n);
    let detected = (has("event") && (has("handler") || has("bus")))
        || has("kafka")
        || has("rabbitmq")
        || (has("message") && has("queue"));
    detected.then(|| {
        Hypothesis::new(
            "Event-driven architecture",
            0.75,
            "Modern Architecture",
            evidence([("event_files", json!(input.files_containing(&["event", "kafka", "rabbitmq", "queue"]).len()))]),
            &["Asynchronous communication", "Loose coupling", "Scalable and resilient"],
        )
    })
}

fn graphql(input: &AnalysisInput<'_>) -> Option<Hypothesis> {
    let files = input.files_containing(&["graphql"]);
    (!files.is_empty()).then(|| {
        Hypothesis::new(
            "GraphQL API architecture",
            0.9,
            "API Pattern",
            evidence([("graphql_files", json!(files.len()))]),
            &["Flexible data querying", "Single endpoint", "Type-safe API"],
        )
    })
}

// ── Analyzer ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HypothesisAnalyzer;

impl Analyzer for HypothesisAnalyzer {
    type Output = Hypothesis;

    fn name(&self) -> &'static str {
        "hypotheses"
    }

    #[instrument(skip_all, name = "hypotheses_analyze")]
    fn analyze(&self, input: &AnalysisInput<'_>) -> Vec<Hypothesis> {
        let category = input.category();
        let found: Vec<Hypothesis> = HYPOTHESIS_RULES
            .iter()
            .filter(|rule| rule.scope.admits(category))
            .filter_map(|rule| {
                let hypothesis = (rule.infer)(input);
                if hypothesis.is_some() {
                    debug!(rule = rule.name, "Hypothesis matched");
                }
                hypothesis
            })
            .collect();
        debug!(count = found.len(), "Hypotheses inferred");
        found
    }
}
