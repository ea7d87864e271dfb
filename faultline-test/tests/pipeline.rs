use std::collections::BTreeSet;

use faultline_core::config::FaultlineConfig;
use faultline_core::pipeline::{AnalysisPipeline, AnalysisReport};
use faultline_core::render::{JsonRenderer, MarkdownRenderer, Renderer};
use faultline_core::stress::{StressResult, get_applicable_scenarios};
use faultline_core::types::{ArchitectureType, Severity};
use faultline_test::{analyze, cli_tool, django_backend, hub_and_spoke, microservices, nextjs_fullstack, react_spa};

fn result<'a>(report: &'a AnalysisReport, name: &str) -> &'a StressResult {
    report
        .stress_results
        .iter()
        .find(|r| r.stress == name)
        .unwrap_or_else(|| panic!("no result for {name}"))
}

fn affected_set(result: &StressResult) -> BTreeSet<&str> {
    result.affected_files.iter().map(String::as_str).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

// ── Detection ────────────────────────────────────────────────────────

#[test]
fn react_spa_is_static_spa() {
    let report = analyze(&react_spa());
    let detection = &report.detection;
    assert_eq!(detection.architecture_type, ArchitectureType::StaticSpa);
    assert_eq!(detection.tech_stack.framework.as_deref(), Some("React"));
    assert_eq!(detection.tech_stack.language.as_deref(), Some("TypeScript"));
    assert!(detection.tech_stack.is_static);

    assert!(report.layers.files("ui").contains(&"src/components/Button.tsx".to_string()));
    assert_eq!(report.layers.files("hooks"), ["src/hooks/useCart.ts".to_string()]);
    assert_eq!(report.layers.files("pages").len(), 2);
}

#[test]
fn django_is_backend_api() {
    let report = analyze(&django_backend());
    assert_eq!(report.detection.architecture_type, ArchitectureType::BackendApi);
    assert_eq!(report.detection.tech_stack.framework.as_deref(), Some("Django"));
    assert_eq!(report.detection.tech_stack.language.as_deref(), Some("Python"));

    let api: BTreeSet<&str> = report.layers.files("api").iter().map(String::as_str).collect();
    assert_eq!(api, BTreeSet::from(["shop/urls.py", "shop/views.py", "shop/api/orders.py"]));
    assert_eq!(report.layers.files("db"), ["shop/db/session.py".to_string()]);
    assert!(report.layers.files("unknown").contains(&"manage.py".to_string()));
}

#[test]
fn nextjs_is_full_stack() {
    let report = analyze(&nextjs_fullstack());
    assert_eq!(report.detection.architecture_type, ArchitectureType::FullStack);
    assert_eq!(report.detection.tech_stack.framework.as_deref(), Some("Next.js"));
    assert!(report.detection.tech_stack.has_ssr);
    assert!(report.detection.tech_stack.has_api_routes);
    assert_eq!(report.layers.files("api").len(), 2);
    assert_eq!(report.layers.files("utils").len(), 3);
}

#[test]
fn docker_services_are_microservices() {
    let report = analyze(&microservices());
    assert_eq!(report.detection.architecture_type, ArchitectureType::Microservices);
    assert!(result(&report, "service_outage").is_applicable);
}

#[test]
fn click_project_is_cli_tool() {
    let report = analyze(&cli_tool());
    assert_eq!(report.detection.architecture_type, ArchitectureType::CliTool);
    let names: Vec<&str> = report.stress_results.iter().map(|r| r.stress.as_str()).collect();
    assert_eq!(names, vec!["team_scale", "public_api_change"]);
}

// ── Stress results ───────────────────────────────────────────────────

#[test]
fn results_follow_catalog_applicability() {
    for snapshot in [react_spa(), django_backend(), nextjs_fullstack()] {
        let report = analyze(&snapshot);
        let expected: Vec<&str> = get_applicable_scenarios(report.detection.architecture_type)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        let names: Vec<&str> = report.stress_results.iter().map(|r| r.stress.as_str()).collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn traffic_stays_on_request_edges() {
    let report = analyze(&django_backend());
    let traffic = result(&report, "traffic_spike");
    assert!(traffic.is_applicable);
    assert_eq!(
        affected_set(traffic),
        BTreeSet::from([
            "shop/urls.py",
            "shop/views.py",
            "shop/api/orders.py",
            "shop/services/orders.py",
            "shop/services/payments.py",
            "shop/models/order.py",
            "shop/db/session.py",
        ])
    );
    assert_eq!(traffic.bottlenecks.len(), 3);
    assert!(traffic.bottlenecks.iter().all(|b| b.severity == Severity::Critical));
    assert!(traffic.failure_mode.contains("API entry point takes the full request surge"));
    assert_close(traffic.confidence, 0.95);
}

#[test]
fn service_outage_walks_to_dependents() {
    let report = analyze(&django_backend());
    let outage = result(&report, "service_outage");
    assert_eq!(
        affected_set(outage),
        BTreeSet::from([
            "shop/services/orders.py",
            "shop/services/payments.py",
            "shop/views.py",
            "shop/api/orders.py",
            "shop/urls.py",
        ])
    );
    let urls = outage.evidence.iter().find(|e| e.file == "shop/urls.py").unwrap();
    assert_eq!(urls.depth, 2);
    assert_eq!(urls.reason, "Affected by stress propagation (2 hops)");
    assert_eq!(outage.bottlenecks.len(), 2);
    assert!(outage.bottlenecks.iter().all(|b| b.severity == Severity::High));
    assert_close(outage.confidence, 0.875);
}

#[test]
fn database_exhaustion_flags_data_layer() {
    let report = analyze(&django_backend());
    let db = result(&report, "database_exhaustion");
    assert_eq!(
        affected_set(db),
        BTreeSet::from(["shop/models/order.py", "shop/db/session.py", "shop/utils/money.py"])
    );
    let flagged: Vec<&str> = db.bottlenecks.iter().filter_map(|b| b.file_path.as_deref()).collect();
    assert_eq!(flagged, vec!["shop/models/order.py", "shop/db/session.py"]);
    assert_eq!(db.worst_severity(), Some(Severity::Critical));
    assert!(db.safe_components.contains(&"api".to_string()));
    assert_close(db.confidence, 0.925);
}

#[test]
fn bundle_bloat_flags_shared_button() {
    let report = analyze(&react_spa());
    let bloat = result(&report, "bundle_bloat");
    assert!(bloat.is_applicable);
    let button = bloat
        .bottlenecks
        .iter()
        .find(|b| b.component == "Button.tsx")
        .expect("Button.tsx should be a bottleneck");
    assert_eq!(button.severity, Severity::High);
    assert_eq!(report.metrics.fan_in("src/components/Button.tsx"), 5);
    assert!(affected_set(bloat).contains("src/App.tsx"));
    assert_close(bloat.confidence, 0.75);
}

#[test]
fn memory_leak_starts_at_state_keyword() {
    let report = analyze(&react_spa());
    let leak = result(&report, "memory_leak");
    assert_eq!(leak.affected_files.first().map(String::as_str), Some("src/store/cart.ts"));
    let flagged: BTreeSet<&str> = leak.bottlenecks.iter().map(|b| b.component.as_str()).collect();
    assert!(flagged.contains("cart.ts"));
    assert!(flagged.contains("useCart.ts"));
}

#[test]
fn auth_bottleneck_finds_auth_helpers() {
    let report = analyze(&nextjs_fullstack());
    let auth = result(&report, "auth_bottleneck");
    assert!(auth.is_applicable);
    let critical: BTreeSet<&str> = auth
        .bottlenecks
        .iter()
        .filter(|b| b.severity == Severity::Critical)
        .filter_map(|b| b.file_path.as_deref())
        .collect();
    assert!(critical.contains("lib/auth.ts"));
    assert!(critical.contains("pages/api/auth/login.ts"));
    assert!(affected_set(auth).contains("models/order.ts"));
}

#[test]
fn unmatched_layers_are_reported() {
    let report = analyze(&cli_tool());
    let team = result(&report, "team_scale");
    assert!(!team.is_applicable);
    assert_eq!(
        team.failure_mode,
        "No files matched target layers [utils, services, models]; available layers: unknown"
    );
    assert!(team.affected_files.is_empty());
    assert!(team.confidence.abs() < f64::EPSILON);

    let public = result(&report, "public_api_change");
    assert!(public.is_applicable);
    assert_eq!(public.affected_files.len(), 6);
    assert!(public.bottlenecks.is_empty());
    assert_eq!(public.failure_mode, "Cascading dependency failure");
}

#[test]
fn fan_in_below_threshold_is_not_a_bottleneck() {
    let report = analyze(&hub_and_spoke(12));
    assert_eq!(report.detection.architecture_type, ArchitectureType::BackendApi);
    assert_eq!(report.metrics.fan_in("app/core/utils.py"), 12);
    assert!(report.metrics.god_modules.is_empty());

    let team = result(&report, "team_scale");
    let flagged: Vec<&str> = team.bottlenecks.iter().map(|b| b.component.as_str()).collect();
    assert_eq!(flagged, vec!["billing.py"]);
}

#[test]
fn fan_in_above_threshold_is_single_point_of_failure() {
    let report = analyze(&hub_and_spoke(16));
    assert!(report.metrics.is_god_module("app/core/utils.py"));

    let team = result(&report, "team_scale");
    assert_eq!(team.affected_files.len(), 18);
    assert_eq!(team.failure_mode, "utils.py: Single point of failure: 16 files depend on it");
    assert!(
        team.recommendations
            .contains(&"Break up utils.py (16 dependents) before it fails under team_scale".to_string())
    );
}

#[test]
fn affected_files_respect_cap() {
    let mut config = FaultlineConfig::default();
    config.stress.max_affected_files = 5;
    let report = AnalysisPipeline::new(config).run(&hub_and_spoke(16));
    let team = result(&report, "team_scale");
    assert_eq!(team.affected_files.len(), 5);
    assert_eq!(team.impact_path.len(), 5);
}

// ── Rendering ────────────────────────────────────────────────────────

#[test]
fn reports_render_end_to_end() {
    let report = analyze(&django_backend());

    let markdown = MarkdownRenderer.render(&report).unwrap();
    assert!(markdown.contains("backend_api"));
    assert!(markdown.contains("traffic_spike"));

    let json = JsonRenderer.render(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "1");
    assert_eq!(value["detection"]["architecture_type"], "backend_api");
    assert_eq!(value["file_count"], 11);
}
