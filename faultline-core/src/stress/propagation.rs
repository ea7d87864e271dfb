// Start-node resolution and bounded propagation over the traversal graph.

use std::collections::HashSet;

use faultline_graphs::{DependencyGraph, TraversalGraph, Visit};

use crate::detect::evidence::{basename, normalize_path};
use crate::types::Layers;

use super::models::PropagationType;

// ── Start resolution ───────────────────────────────────────────────

/// Abstract target name → layer buckets it may be spelled as.
const LAYER_ALIASES: &[(&str, &[&str])] = &[
    ("ui", &["ui", "frontend", "components", "pages", "src"]),
    ("api", &["api", "routes", "controllers", "endpoints", "handlers"]),
    ("services", &["services", "service"]),
    ("models", &["models", "model", "schema"]),
    ("db", &["db", "repository", "database"]),
    ("pages", &["pages", "app"]),
    ("utils", &["utils", "lib", "core", "shared"]),
    ("state", &["state", "store", "stores"]),
];

const UI_TARGETS: &[&str] = &["ui", "pages", "components", "frontend"];
const UI_EXTENSIONS: &[&str] = &[".tsx", ".jsx", ".vue", ".svelte", ".html"];

/// Path markers for targets that are concerns rather than layers.
const KEYWORD_FALLBACKS: &[(&str, &[&str])] = &[
    ("auth", &["auth", "login", "session", "jwt", "oauth"]),
    ("state", &["store", "state", "redux", "zustand", "context"]),
    ("forms", &["form"]),
];

pub fn layer_aliases(target: &str) -> Vec<&str> {
    LAYER_ALIASES
        .iter()
        .find(|(name, _)| *name == target)
        .map_or_else(|| vec![target], |(_, aliases)| aliases.to_vec())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartResolution {
    /// Deduplicated, in target order.
    pub files: Vec<String>,
    /// Layer buckets that contributed at least one file.
    pub matched_layers: Vec<String>,
}

impl StartResolution {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Map `targets` to concrete start files.
///
/// Each target is looked up through the alias table first. A target that
/// matches no bucket falls back to UI extensions (for UI-like targets) and
/// then to path keywords. Fallbacks only scan graph keys.
pub fn resolve_start_files(targets: &[String], layers: &Layers, graph: &DependencyGraph) -> StartResolution {
    let mut resolution = StartResolution::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |resolution: &mut StartResolution, file: &str| {
        if seen.insert(file.to_string()) {
            resolution.files.push(file.to_string());
        }
    };

    for target in targets {
        let target = target.as_str();
        let mut matched = false;
        for alias in layer_aliases(target) {
            let files = layers.files(alias);
            if files.is_empty() {
                continue;
            }
            matched = true;
            if !resolution.matched_layers.iter().any(|l| l == alias) {
                resolution.matched_layers.push(alias.to_string());
            }
            for file in files {
                push(&mut resolution, file);
            }
        }
        if matched {
            continue;
        }

        if UI_TARGETS.contains(&target) {
            let before = resolution.files.len();
            for file in graph.files().filter(|f| has_ui_extension(f)) {
                push(&mut resolution, file);
            }
            if resolution.files.len() > before {
                continue;
            }
        }

        if let Some((_, keywords)) = KEYWORD_FALLBACKS.iter().find(|(name, _)| *name == target) {
            for file in graph.files() {
                let path = normalize_path(file);
                if keywords.iter().any(|k| path.contains(k)) {
                    push(&mut resolution, file);
                }
            }
        }
    }

    resolution
}

fn has_ui_extension(file: &str) -> bool {
    let lower = file.to_lowercase();
    UI_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

// ── Traffic flow shapes ────────────────────────────────────────────

/// Coarse role of a file, used to keep traffic on request-shaped edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Page,
    Component,
    Hook,
    Api,
    Service,
    Model,
    Data,
    Store,
    Util,
    Other,
}

/// Directory markers, most specific role first. `/pages/` comes last so
/// nested `services/` or `components/` directories keep their own role.
const ROLE_MARKERS: &[(FileRole, &[&str])] = &[
    (
        FileRole::Api,
        &["/api/", "/routes/", "/controllers/", "/handlers/", "/endpoints/", "/views.py", "/urls.py"],
    ),
    (FileRole::Hook, &["/hooks/"]),
    (FileRole::Store, &["/store/", "/stores/", "/state/", "/redux/", "/context/"]),
    (FileRole::Service, &["/services/", "/service/", "/services.py"]),
    (FileRole::Model, &["/models/", "/model/", "/schema/", "/entities/", "/models.py"]),
    (FileRole::Data, &["/db/", "/database/", "/repository/", "/repositories/", "/migrations/"]),
    (FileRole::Component, &["/components/", "/ui/"]),
    (FileRole::Util, &["/utils/", "/lib/", "/helpers/", "/shared/", "/core/"]),
    (FileRole::Page, &["/pages/"]),
];

/// Basename infixes (`cart.service.ts`, `nav.component.ts`).
const ROLE_SUFFIXES: &[(FileRole, &str)] = &[
    (FileRole::Api, ".controller."),
    (FileRole::Service, ".service."),
    (FileRole::Model, ".model."),
    (FileRole::Store, ".store."),
    (FileRole::Component, ".component."),
];

/// Route-segment files of an `app/` router. Any other file under `app/`
/// is an ordinary package member.
const APP_ROUTER_PAGES: &[&str] = &["page", "layout", "template", "loading", "error", "not-found"];

impl FileRole {
    pub fn of(file: &str) -> Self {
        let path = normalize_path(file);
        if let Some((role, _)) = ROLE_MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| path.contains(m)))
        {
            return *role;
        }
        let base = basename(&path);
        if let Some((role, _)) = ROLE_SUFFIXES.iter().find(|(_, infix)| base.contains(infix)) {
            return *role;
        }
        if path.contains("/app/") {
            let stem = base.split('.').next().unwrap_or(base);
            if stem == "route" {
                return Self::Api;
            }
            if APP_ROUTER_PAGES.contains(&stem) {
                return Self::Page;
            }
        }
        if base.starts_with("use-") {
            return Self::Hook;
        }
        if has_ui_extension(&path) {
            return Self::Component;
        }
        Self::Other
    }
}

/// Whether a request can plausibly flow from `from` to `to`.
pub fn traffic_allows(from: &str, to: &str) -> bool {
    use FileRole::{Api, Component, Data, Hook, Model, Page, Service, Store};

    matches!(
        (FileRole::of(from), FileRole::of(to)),
        (Page | Component, Component | Hook | Service | Api | Store)
            | (Hook, Service | Api | Store)
            | (Store, Service | Api)
            | (Api, Service | Model | Data)
            | (Service, Service | Model | Data)
            | (Model, Model | Data)
    )
}

// ── Propagation ────────────────────────────────────────────────────

/// Bounded BFS from `starts`. Only graph keys are entered, so raw
/// external specifiers never show up as impacted files.
pub fn propagate(
    traversal: &TraversalGraph,
    graph: &DependencyGraph,
    starts: &[String],
    mode: PropagationType,
    max_depth: usize,
) -> Vec<Visit> {
    traversal.bfs(starts.iter().map(String::as_str), max_depth, |from, to| {
        graph.contains(to) && (mode != PropagationType::Traffic || traffic_allows(from, to))
    })
}

#[cfg(test)]
mod tests {
    use faultline_graphs::EdgeDirection;
    use proptest::prelude::*;

    use super::*;
    use crate::layers::infer_layers;
    use crate::types::Category;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn backend_graph() -> DependencyGraph {
        DependencyGraph::from_edges([
            ("app/api/orders.py", vec!["app/services/billing.py", "app/utils/fmt.py"]),
            ("app/services/billing.py", vec!["app/models/order.py", "requests"]),
            ("app/models/order.py", vec!["app/db/session.py"]),
            ("app/db/session.py", vec![]),
            ("app/utils/fmt.py", vec![]),
        ])
    }

    #[test]
    fn aliases_fall_back_to_target() {
        assert!(layer_aliases("ui").contains(&"components"));
        assert_eq!(layer_aliases("forms"), vec!["forms"]);
    }

    #[test]
    fn resolves_through_layers() {
        let graph = backend_graph();
        let layers = infer_layers(graph.files(), Category::Backend);
        let res = resolve_start_files(&strings(&["models", "db"]), &layers, &graph);
        assert_eq!(res.files, vec!["app/models/order.py", "app/db/session.py"]);
        assert_eq!(res.matched_layers, vec!["models", "db"]);
    }

    #[test]
    fn ui_target_falls_back_to_extensions() {
        let graph = DependencyGraph::from_edges([("src/App.tsx", vec!["src/util.ts"]), ("src/util.ts", vec![])]);
        let layers = infer_layers(graph.files(), Category::Unknown);
        let res = resolve_start_files(&strings(&["ui"]), &layers, &graph);
        assert_eq!(res.files, vec!["src/App.tsx"]);
        assert!(res.matched_layers.is_empty());
    }

    #[test]
    fn keyword_fallback_for_auth() {
        let graph = DependencyGraph::from_edges([
            ("server/auth/jwt.py", Vec::<&str>::new()),
            ("server/login_view.py", vec![]),
            ("server/orders.py", vec![]),
        ]);
        let layers = infer_layers(graph.files(), Category::Backend);
        let res = resolve_start_files(&strings(&["auth"]), &layers, &graph);
        assert_eq!(res.files, vec!["server/auth/jwt.py", "server/login_view.py"]);
    }

    #[test]
    fn unmatched_targets_resolve_to_nothing() {
        let graph = backend_graph();
        let layers = infer_layers(graph.files(), Category::Backend);
        let res = resolve_start_files(&strings(&["ui", "forms"]), &layers, &graph);
        assert!(res.is_empty());
    }

    #[test]
    fn starts_are_deduplicated() {
        let graph = backend_graph();
        let layers = infer_layers(graph.files(), Category::Backend);
        let res = resolve_start_files(&strings(&["db", "db"]), &layers, &graph);
        assert_eq!(res.files, vec!["app/db/session.py"]);
    }

    #[test]
    fn file_roles() {
        assert_eq!(FileRole::of("src/pages/index.tsx"), FileRole::Page);
        assert_eq!(FileRole::of("src/components/Button.tsx"), FileRole::Component);
        assert_eq!(FileRole::of("src/Widget.vue"), FileRole::Component);
        assert_eq!(FileRole::of("src/use-cart.ts"), FileRole::Hook);
        assert_eq!(FileRole::of("shop/views.py"), FileRole::Api);
        assert_eq!(FileRole::of("shop/models.py"), FileRole::Model);
        assert_eq!(FileRole::of("README.md"), FileRole::Other);
    }

    #[test]
    fn app_package_keeps_specific_roles() {
        assert_eq!(FileRole::of("app/services/billing.py"), FileRole::Service);
        assert_eq!(FileRole::of("app/models/order.py"), FileRole::Model);
        assert_eq!(FileRole::of("app/main.py"), FileRole::Other);
        assert_eq!(FileRole::of("src/app/services/cart.service.ts"), FileRole::Service);
        assert_eq!(FileRole::of("src/app/cart/cart.component.ts"), FileRole::Component);
        assert_eq!(FileRole::of("src/app/cart/cart.service.ts"), FileRole::Service);
        assert_eq!(FileRole::of("app/components/Nav.tsx"), FileRole::Component);
        assert_eq!(FileRole::of("app/dashboard/page.tsx"), FileRole::Page);
        assert_eq!(FileRole::of("app/layout.tsx"), FileRole::Page);
        assert_eq!(FileRole::of("app/orders/route.ts"), FileRole::Api);
    }

    #[test]
    fn traffic_flows_through_app_packages() {
        assert!(traffic_allows("app/api/orders.py", "app/services/billing.py"));
        assert!(traffic_allows("app/services/billing.py", "app/models/order.py"));
        assert!(traffic_allows("src/app/cart/cart.component.ts", "src/app/cart/cart.service.ts"));
        assert!(traffic_allows("app/dashboard/page.tsx", "app/components/Nav.tsx"));
    }

    #[test]
    fn traffic_shapes() {
        assert!(traffic_allows("src/components/Cart.tsx", "src/services/cart.ts"));
        assert!(traffic_allows("app/api/orders.py", "app/models/order.py"));
        assert!(!traffic_allows("app/api/orders.py", "app/utils/fmt.py"));
        assert!(!traffic_allows("app/models/order.py", "app/services/billing.py"));
    }

    #[test]
    fn traffic_skips_unrelated_files() {
        let graph = backend_graph();
        let traversal = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Forward);
        let visits = propagate(&traversal, &graph, &strings(&["app/api/orders.py"]), PropagationType::Traffic, 3);
        let nodes: Vec<&str> = visits.iter().map(|v| v.node.as_str()).collect();
        assert_eq!(
            nodes,
            vec!["app/api/orders.py", "app/services/billing.py", "app/models/order.py", "app/db/session.py"]
        );
    }

    #[test]
    fn dependency_failure_flows_to_consumers() {
        let graph = backend_graph();
        let traversal = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Reverse);
        let visits = propagate(&traversal, &graph, &strings(&["app/db/session.py"]), PropagationType::Dependency, 2);
        let nodes: Vec<(&str, usize)> = visits.iter().map(|v| (v.node.as_str(), v.depth)).collect();
        assert_eq!(
            nodes,
            vec![("app/db/session.py", 0), ("app/models/order.py", 1), ("app/services/billing.py", 2)]
        );
    }

    #[test]
    fn external_specifiers_are_never_entered() {
        let graph = backend_graph();
        let traversal = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Forward);
        let visits = propagate(&traversal, &graph, &strings(&["app/services/billing.py"]), PropagationType::Data, 3);
        assert!(visits.iter().all(|v| v.node != "requests"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn propagation_is_unique_and_bounded(
            edges in prop::collection::vec((0u8..20, 0u8..20), 0..60),
            start in 0u8..20,
            max_depth in 0usize..5,
            reverse in any::<bool>(),
        ) {
            let mut graph = DependencyGraph::new();
            for (a, b) in &edges {
                graph.add_import(&format!("m{a}.py"), format!("m{b}.py"));
            }
            graph.ensure_file(&format!("m{start}.py"));
            let mode = if reverse { PropagationType::Dependency } else { PropagationType::Data };
            let traversal = TraversalGraph::from_dependency_graph(&graph, mode.edge_direction());
            let visits = propagate(&traversal, &graph, &[format!("m{start}.py")], mode, max_depth);

            let unique: HashSet<&str> = visits.iter().map(|v| v.node.as_str()).collect();
            prop_assert_eq!(unique.len(), visits.len());
            prop_assert!(visits.iter().all(|v| v.depth <= max_depth));
            prop_assert!(visits.iter().all(|v| graph.contains(&v.node)));
        }
    }
}
