// Layer inference: bucket files into logical layers by path markers.
//
// The rule set is chosen by the detected category. Rules are tried in
// order and the first match wins; unmatched files land in `unknown`.

use tracing::debug;

use crate::detect::evidence::normalize_path;
use crate::types::{Category, Layers};

pub const UNKNOWN_LAYER: &str = "unknown";

/// `(layer, path markers)`; markers are matched against lower-cased
/// paths with a leading `/`.
pub type LayerRule = (&'static str, &'static [&'static str]);

pub const FRONTEND_RULES: &[LayerRule] = &[
    ("ui", &["/ui/", "/components/"]),
    ("hooks", &["/hooks/"]),
    ("pages", &["/pages/"]),
    ("utils", &["/lib/", "/utils/"]),
];

pub const BACKEND_RULES: &[LayerRule] = &[
    ("api", &["/api/", "/routes/", "/views.py", "/urls.py"]),
    ("services", &["/service/", "/services/", "/services.py"]),
    ("models", &["/model/", "/models/", "/schema/", "/models.py"]),
    ("db", &["/db/", "/repository/"]),
    ("utils", &["/utils/", "/core/"]),
];

/// API routes are checked before UI so `pages/api/` lands in `api`.
pub const FULLSTACK_RULES: &[LayerRule] = &[
    ("api", &["/api/", "/routes/", "/views.py", "/urls.py"]),
    ("ui", &["/ui/", "/components/"]),
    ("hooks", &["/hooks/"]),
    ("services", &["/service/", "/services/", "/services.py"]),
    ("models", &["/model/", "/models/", "/schema/", "/models.py"]),
    ("db", &["/db/", "/repository/"]),
    ("utils", &["/lib/", "/utils/", "/core/"]),
    // Last, so `app/services/` and friends keep their own layer.
    ("pages", &["/pages/", "/app/"]),
];

pub fn rules_for(category: Category) -> &'static [LayerRule] {
    match category {
        Category::Frontend => FRONTEND_RULES,
        Category::Backend => BACKEND_RULES,
        Category::Fullstack => FULLSTACK_RULES,
        Category::Unknown => &[],
    }
}

/// First layer whose markers match `file`.
pub fn classify_file(rules: &[LayerRule], file: &str) -> &'static str {
    let path = normalize_path(file);
    rules
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| path.contains(m)))
        .map_or(UNKNOWN_LAYER, |(layer, _)| *layer)
}

/// Bucket `files` for `category`. Every bucket of the rule set is present,
/// even when empty.
pub fn infer_layers<S: AsRef<str>>(files: impl IntoIterator<Item = S>, category: Category) -> Layers {
    let rules = rules_for(category);
    let mut layers = Layers::new();
    for (layer, _) in rules {
        layers.add_bucket(layer);
    }
    layers.add_bucket(UNKNOWN_LAYER);

    for file in files {
        let file = file.as_ref();
        layers.push(classify_file(rules, file), file);
    }

    debug!(
        category = %category,
        buckets = layers.names().count(),
        unknown = layers.files(UNKNOWN_LAYER).len(),
        "Layers inferred"
    );
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_buckets() {
        let layers = infer_layers(
            [
                "src/components/Button.tsx",
                "src/ui/Modal.tsx",
                "src/hooks/useAuth.ts",
                "src/pages/Home.tsx",
                "src/utils/format.ts",
                "src/main.tsx",
            ],
            Category::Frontend,
        );
        assert_eq!(layers.files("ui").len(), 2);
        assert_eq!(layers.files("hooks"), ["src/hooks/useAuth.ts"]);
        assert_eq!(layers.files("pages"), ["src/pages/Home.tsx"]);
        assert_eq!(layers.files("utils"), ["src/utils/format.ts"]);
        assert_eq!(layers.files("unknown"), ["src/main.tsx"]);
        assert_eq!(layers.file_count(), 6);
    }

    #[test]
    fn backend_buckets_include_django_modules() {
        let layers = infer_layers(
            [
                "shop/views.py",
                "shop/models.py",
                "shop/services/billing.py",
                "shop/db/session.py",
                "manage.py",
            ],
            Category::Backend,
        );
        assert_eq!(layers.files("api"), ["shop/views.py"]);
        assert_eq!(layers.files("models"), ["shop/models.py"]);
        assert_eq!(layers.files("services"), ["shop/services/billing.py"]);
        assert_eq!(layers.files("db"), ["shop/db/session.py"]);
        assert_eq!(layers.files("unknown"), ["manage.py"]);
        assert!(layers.files("utils").is_empty());
    }

    #[test]
    fn first_rule_wins() {
        // /api/ is checked before /services/.
        assert_eq!(classify_file(BACKEND_RULES, "src/api/services/user.ts"), "api");
        assert_eq!(classify_file(FULLSTACK_RULES, "pages/api/users.ts"), "api");
        assert_eq!(classify_file(FULLSTACK_RULES, "pages/index.tsx"), "pages");
    }

    #[test]
    fn app_router_directories_keep_inner_layer() {
        assert_eq!(classify_file(FULLSTACK_RULES, "app/services/orders.ts"), "services");
        assert_eq!(classify_file(FULLSTACK_RULES, "app/lib/db.ts"), "utils");
        assert_eq!(classify_file(FULLSTACK_RULES, "app/api/orders/route.ts"), "api");
        assert_eq!(classify_file(FULLSTACK_RULES, "app/dashboard/page.tsx"), "pages");
    }

    #[test]
    fn top_level_directories_match() {
        assert_eq!(classify_file(FRONTEND_RULES, "components/Nav.tsx"), "ui");
        assert_eq!(classify_file(FRONTEND_RULES, "Components/Nav.tsx"), "ui");
    }

    #[test]
    fn empty_buckets_are_present() {
        let layers = infer_layers(Vec::<String>::new(), Category::Backend);
        let names: Vec<&str> = layers.names().collect();
        assert_eq!(names, vec!["api", "db", "models", "services", "unknown", "utils"]);
        assert_eq!(layers.file_count(), 0);
    }

    #[test]
    fn unknown_category_is_single_bucket() {
        let layers = infer_layers(["src/api/x.py", "lib/y.py"], Category::Unknown);
        assert_eq!(layers.names().collect::<Vec<_>>(), vec!["unknown"]);
        assert_eq!(layers.files("unknown").len(), 2);
    }
}
