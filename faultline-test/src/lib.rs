// Snapshot fixtures and helpers shared by the integration tests.

use std::path::{Path, PathBuf};

use faultline_core::pipeline::{AnalysisPipeline, AnalysisReport};
use faultline_core::snapshot::RepoSnapshot;
use faultline_graphs::{SymbolKind, SymbolRecord};

// ── Builder ──────────────────────────────────────────────────────────

/// Assembles a [`RepoSnapshot`] the way an extractor would report it.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: RepoSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source file: listed, given a module symbol, and importing
    /// `imports` verbatim.
    pub fn module(mut self, path: &str, imports: &[&str]) -> Self {
        self.list(path);
        let language = language_for(path);
        self.snapshot
            .symbols
            .push(SymbolRecord::new(module_name(path), SymbolKind::Module, path, language));
        for spec in imports {
            self.snapshot.symbols.push(SymbolRecord::import(*spec, path, language));
        }
        self
    }

    /// A file with no symbols (manifest, Dockerfile, config).
    pub fn file(mut self, path: &str) -> Self {
        self.list(path);
        self
    }

    /// Attach text used by the content heuristics.
    pub fn content(mut self, path: &str, text: &str) -> Self {
        self.list(path);
        self.snapshot.contents.insert(path.to_string(), text.to_string());
        self
    }

    pub fn build(self) -> RepoSnapshot {
        self.snapshot
    }

    fn list(&mut self, path: &str) {
        if !self.snapshot.files.iter().any(|f| f == path) {
            self.snapshot.files.push(path.to_string());
        }
    }
}

fn module_name(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.split('.').next().unwrap_or(base)
}

fn language_for(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("py") => "python",
        Some("ts" | "tsx") => "typescript",
        Some("js" | "jsx") => "javascript",
        Some("go") => "go",
        Some("rs") => "rust",
        _ => "unknown",
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

/// React single-page app. `Button.tsx` is imported by five components.
pub fn react_spa() -> RepoSnapshot {
    SnapshotBuilder::new()
        .content("package.json", r#"{"dependencies":{"react":"^18.2.0","react-dom":"^18.2.0"}}"#)
        .module("src/index.tsx", &["react", "react-dom/client", "./App"])
        .content("src/index.tsx", "createRoot(document.getElementById('root')).render(<App />)")
        .module("src/App.tsx", &["react", "./pages/Home", "./pages/Checkout"])
        .content("src/App.tsx", "const [route, setRoute] = useState('home'); useEffect(() => {}, []);")
        .module("src/pages/Home.tsx", &["../components/Header", "../components/ProductList", "../components/Footer"])
        .module(
            "src/pages/Checkout.tsx",
            &["../components/Header", "../components/CheckoutForm", "../components/Modal", "../hooks/useCart"],
        )
        .module("src/components/Header.tsx", &["react", "./Button"])
        .module("src/components/Footer.tsx", &["./Button"])
        .module("src/components/Modal.tsx", &["./Button"])
        .module("src/components/ProductList.tsx", &["./Button", "../hooks/useCart", "../utils/format"])
        .module("src/components/CheckoutForm.tsx", &["./Button", "../services/api"])
        .module("src/components/Button.tsx", &["react"])
        .module("src/hooks/useCart.ts", &["react", "../store/cart"])
        .module("src/store/cart.ts", &[])
        .module("src/services/api.ts", &["../utils/format"])
        .module("src/utils/format.ts", &[])
        .build()
}

/// Django shop with api, services, models, db and utils layers.
pub fn django_backend() -> RepoSnapshot {
    SnapshotBuilder::new()
        .content("requirements.txt", "django\npsycopg2\n")
        .module("manage.py", &["django.core.management"])
        .module("shop/settings.py", &[])
        .content(
            "shop/settings.py",
            "INSTALLED_APPS = ['django.contrib.admin', 'shop']\nMIDDLEWARE = []\n\
             DATABASES = {'default': {'NAME': 'postgresql://localhost/shop'}}\n",
        )
        .module("shop/urls.py", &["django.urls", "shop.views"])
        .module("shop/views.py", &["django.http", "shop.services.orders", "shop.services.payments"])
        .module("shop/api/orders.py", &["shop.services.orders"])
        .module("shop/services/orders.py", &["shop.models.order", "shop.db.session", "shop.utils.money"])
        .module("shop/services/payments.py", &["shop.models.order", "shop.utils.money"])
        .module("shop/models/order.py", &["django.db", "shop.utils.money"])
        .module("shop/db/session.py", &["psycopg2"])
        .module("shop/utils/money.py", &[])
        .build()
}

/// Next.js app with API routes and an auth helper.
pub fn nextjs_fullstack() -> RepoSnapshot {
    SnapshotBuilder::new()
        .content("package.json", r#"{"dependencies":{"next":"14.1.0","react":"^18.2.0"}}"#)
        .content("next.config.js", "module.exports = { reactStrictMode: true }")
        .module("pages/_app.tsx", &["react", "../components/Layout"])
        .module("pages/index.tsx", &["next/link", "../components/OrderList", "../lib/api-client"])
        .content("pages/index.tsx", "export async function getServerSideProps() { return { props: {} } }")
        .module("pages/orders/[id].tsx", &["next/router", "../../components/OrderList"])
        .module("pages/api/orders.ts", &["../../services/orders", "../../lib/auth"])
        .module("pages/api/auth/login.ts", &["../../../lib/auth", "../../../lib/db"])
        .module("components/Layout.tsx", &["react"])
        .module("components/OrderList.tsx", &["react"])
        .module("services/orders.ts", &["../lib/db", "../models/order"])
        .module("models/order.ts", &[])
        .module("lib/db.ts", &["pg"])
        .module("lib/auth.ts", &["jsonwebtoken", "./db"])
        .module("lib/api-client.ts", &[])
        .build()
}

/// Three containerized Python services sharing one client module.
pub fn microservices() -> RepoSnapshot {
    SnapshotBuilder::new()
        .file("docker-compose.yml")
        .file("services/orders/Dockerfile")
        .module("services/orders/api/routes.py", &["fastapi", "services.orders.logic"])
        .module("services/orders/logic.py", &["services.shared.client"])
        .file("services/users/Dockerfile")
        .module("services/users/api/routes.py", &["fastapi", "services.users.logic"])
        .module("services/users/logic.py", &["services.shared.client"])
        .module("services/shared/client.py", &["httpx"])
        .file("gateway/Dockerfile")
        .module("gateway/api/proxy.py", &["fastapi", "services.shared.client"])
        .build()
}

/// Click-based command line tool.
pub fn cli_tool() -> RepoSnapshot {
    SnapshotBuilder::new()
        .file("pyproject.toml")
        .module("faultcli/__init__.py", &[])
        .module("faultcli/__main__.py", &["faultcli.cli"])
        .module("faultcli/cli.py", &["click", "faultcli.commands.scan", "faultcli.commands.report"])
        .module("faultcli/commands/scan.py", &["faultcli.util"])
        .module("faultcli/commands/report.py", &["faultcli.util"])
        .module("faultcli/util.py", &[])
        .build()
}

/// Backend whose `n` API handlers all import `app/core/utils.py`, plus one
/// standalone service.
pub fn hub_and_spoke(n: usize) -> RepoSnapshot {
    let mut builder = SnapshotBuilder::new()
        .module("app/core/utils.py", &[])
        .module("app/services/billing.py", &[]);
    for i in 0..n {
        builder = builder.module(&format!("app/api/handler_{i}.py"), &["app.core.utils"]);
    }
    builder.build()
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Write `snapshot` as `snapshot.json` under `dir`.
pub fn write_snapshot(dir: &Path, snapshot: &RepoSnapshot) -> PathBuf {
    let path = dir.join("snapshot.json");
    let json = serde_json::to_string_pretty(snapshot).expect("serialize snapshot");
    std::fs::write(&path, json).expect("write snapshot");
    path
}

/// A snapshot persisted in its own temporary directory.
#[derive(Debug)]
pub struct SnapshotFile {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl SnapshotFile {
    pub fn new(snapshot: &RepoSnapshot) -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = write_snapshot(dir.path(), snapshot);
        Self { dir, path }
    }

    /// Write a `faultline.toml` next to the snapshot.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.dir.path().join("faultline.toml"), toml).expect("write config");
        self
    }
}

/// Run the default pipeline over `snapshot`.
pub fn analyze(snapshot: &RepoSnapshot) -> AnalysisReport {
    AnalysisPipeline::default().run(snapshot)
}
