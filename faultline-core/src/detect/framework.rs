use std::sync::LazyLock;

use tracing::debug;

use crate::config::DetectionSection;
use crate::types::{FrameworkCategory, FrameworkDetection};

use super::evidence::{CandidatePatterns, EvidenceIndex, FRAMEWORK_WEIGHTS, score_all};

use FrameworkCategory::{Backend, Desktop, Frontend, Fullstack, Mobile};

/// Built-in framework table. Order matters: it breaks score ties.
static BUILTIN_FRAMEWORKS: LazyLock<Vec<CandidatePatterns>> = LazyLock::new(|| {
    vec![
        // Python backends
        CandidatePatterns::new(
            "Django",
            Backend,
            &["django", "django.conf", "django.urls", "django.http", "django.db"],
            &["manage.py", "settings.py", "wsgi.py", "asgi.py"],
            &["INSTALLED_APPS", "MIDDLEWARE", "django.contrib"],
        ),
        CandidatePatterns::new(
            "FastAPI",
            Backend,
            &["fastapi", "fastapi.responses", "pydantic"],
            &[],
            &["FastAPI()", "@app.get", "@app.post"],
        ),
        CandidatePatterns::new(
            "Flask",
            Backend,
            &["flask", "flask.request", "flask.jsonify"],
            &["app.py", "wsgi.py"],
            &["Flask(__name__)", "@app.route"],
        ),
        // JavaScript/TypeScript backends
        CandidatePatterns::new(
            "Express.js",
            Backend,
            &["express", "express-validator"],
            &["server.js", "app.js"],
            &["express()", "app.listen", "app.get", "app.post", "express.Router"],
        ),
        CandidatePatterns::new(
            "NestJS",
            Backend,
            &["@nestjs/core", "@nestjs/common", "@nestjs/platform-express"],
            &["main.ts", "app.module.ts"],
            &["@Controller", "@Get", "@Post", "@Module", "NestFactory"],
        ),
        CandidatePatterns::new(
            "Koa",
            Backend,
            &["koa", "koa-router"],
            &["server.js", "app.js"],
            &["new Koa()", "ctx.body"],
        ),
        CandidatePatterns::new("Hapi", Backend, &["@hapi/hapi"], &[], &["Hapi.server", "server.route"]),
        // Frontend and full-stack
        CandidatePatterns::new(
            "React",
            Frontend,
            &["react", "react-dom", "react/jsx-runtime"],
            &["App.tsx", "App.jsx", "index.tsx"],
            &["React.Component", "useState", "useEffect", "createRoot"],
        ),
        CandidatePatterns::new(
            "Next.js",
            Fullstack,
            &["next", "next/router", "next/link", "next/image"],
            &["next.config.js", "pages/_app", "app/layout"],
            &["getServerSideProps", "getStaticProps", "NextPage"],
        ),
        CandidatePatterns::new(
            "Vue",
            Frontend,
            &["vue", "@vue/runtime-core"],
            &["App.vue", "main.js"],
            &["createApp", "Vue.component", "<template>"],
        ),
        CandidatePatterns::new(
            "Nuxt",
            Fullstack,
            &["nuxt", "@nuxt/kit"],
            &["nuxt.config.ts", "nuxt.config.js"],
            &["defineNuxtConfig", "useNuxtApp"],
        ),
        CandidatePatterns::new(
            "Angular",
            Frontend,
            &["@angular/core", "@angular/common"],
            &["angular.json", "app.module.ts"],
            &["@Component", "@NgModule", "@Injectable"],
        ),
        CandidatePatterns::new(
            "Svelte",
            Frontend,
            &["svelte"],
            &["App.svelte"],
            &["<script>", "<style>", "export let"],
        ),
        CandidatePatterns::new(
            "SvelteKit",
            Fullstack,
            &["@sveltejs/kit"],
            &["svelte.config.js"],
            &["export const load"],
        ),
        // Go
        CandidatePatterns::new(
            "Gin",
            Backend,
            &["github.com/gin-gonic/gin"],
            &["main.go"],
            &["gin.Default()", "gin.Engine", "c.JSON", "router.GET"],
        ),
        CandidatePatterns::new(
            "Echo",
            Backend,
            &["github.com/labstack/echo"],
            &["main.go"],
            &["echo.New()", "c.String", "e.GET"],
        ),
        CandidatePatterns::new(
            "Fiber",
            Backend,
            &["github.com/gofiber/fiber"],
            &["main.go"],
            &["fiber.New()", "c.SendString", "app.Get"],
        ),
        // Mobile
        CandidatePatterns::new(
            "React Native",
            Mobile,
            &["react-native", "react-native/Libraries"],
            &["App.tsx", "app.json", "metro.config.js"],
            &["AppRegistry", "StyleSheet.create"],
        ),
        CandidatePatterns::new(
            "Flutter",
            Mobile,
            &["package:flutter"],
            &["pubspec.yaml", "lib/main.dart"],
            &["flutter:", "StatelessWidget", "StatefulWidget"],
        ),
        // Desktop
        CandidatePatterns::new(
            "Electron",
            Desktop,
            &["electron"],
            &["main.js", "preload.js"],
            &["BrowserWindow", "app.whenReady"],
        ),
        CandidatePatterns::new(
            "Tauri",
            Desktop,
            &["@tauri-apps/api"],
            &["tauri.conf.json", "src-tauri/"],
            &["tauri::Builder", "#[tauri::command]"],
        ),
    ]
});

pub fn builtin_frameworks() -> &'static [CandidatePatterns] {
    &BUILTIN_FRAMEWORKS
}

/// Every framework scoring strictly above the configured threshold,
/// highest confidence first. Equal scores keep table order.
pub fn detect_frameworks(index: &EvidenceIndex, config: &DetectionSection) -> Vec<FrameworkDetection> {
    let table = builtin_frameworks().iter().chain(&config.extra_frameworks);
    let mut detected: Vec<FrameworkDetection> = score_all(index, table, FRAMEWORK_WEIGHTS)
        .into_iter()
        .filter(|s| s.score > config.framework_threshold)
        .map(|s| FrameworkDetection {
            name: s.name,
            category: s.category,
            confidence: s.score,
            evidence: s.evidence,
        })
        .collect();

    detected.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    debug!(
        count = detected.len(),
        primary = detected.first().map(|f| f.name.as_str()),
        "Framework detection"
    );
    detected
}
