// Built-in stress scenario catalog.

use std::sync::LazyLock;

use crate::types::ArchitectureType;

use super::models::{PropagationType, StressVector};

use ArchitectureType::{
    BackendApi, CliTool, FullStack, GraphqlApi, Library, Microservices, RestApi, SsrApp, StaticSpa, Unknown,
};

const DEFAULT_THRESHOLD: f64 = 0.3;

fn vector(
    name: &str,
    description: &str,
    target_layers: &[&str],
    severity: f64,
    propagation_type: PropagationType,
    architecture_types: &[ArchitectureType],
) -> StressVector {
    StressVector {
        name: name.to_string(),
        description: description.to_string(),
        target_layers: target_layers.iter().map(|l| (*l).to_string()).collect(),
        severity,
        propagation_type,
        architecture_types: architecture_types.to_vec(),
        min_severity_threshold: DEFAULT_THRESHOLD,
    }
}

static CATALOG: LazyLock<Vec<StressVector>> = LazyLock::new(|| {
    use PropagationType::{Auth, Data, Dependency, Traffic};

    let interactive = [StaticSpa, SsrApp, FullStack, BackendApi, RestApi, GraphqlApi, Microservices];
    vec![
        vector(
            "traffic_spike",
            "Sudden surge of requests hitting API entry points",
            &["api", "ui"],
            0.9,
            Traffic,
            &[RestApi, BackendApi, GraphqlApi, FullStack, SsrApp, Microservices],
        ),
        vector(
            "increased_concurrency",
            "More simultaneous users than initially assumed",
            &["ui", "hooks", "services"],
            0.8,
            Traffic,
            &interactive,
        ),
        vector(
            "api_instability",
            "External backend APIs change or become unreliable",
            &["api", "ui"],
            0.7,
            Dependency,
            &interactive,
        ),
        vector(
            "team_scale",
            "Multiple teams modifying the codebase",
            &["utils", "services", "models"],
            0.6,
            Dependency,
            &[Unknown],
        ),
        vector(
            "database_exhaustion",
            "Connection pool or query capacity exhausted",
            &["models", "db"],
            0.85,
            Data,
            &[BackendApi, RestApi, GraphqlApi, FullStack, Microservices],
        ),
        vector(
            "bundle_bloat",
            "Shared UI code grows until load time suffers",
            &["ui", "pages"],
            0.5,
            Dependency,
            &[StaticSpa, SsrApp, FullStack],
        ),
        vector(
            "memory_leak",
            "Long-lived client state accumulates without release",
            &["state", "hooks", "ui"],
            0.6,
            Data,
            &[StaticSpa, SsrApp, FullStack],
        ),
        vector(
            "auth_bottleneck",
            "Authentication checks become the throughput limit",
            &["auth", "api"],
            0.8,
            Auth,
            &[BackendApi, RestApi, GraphqlApi, FullStack, Microservices, SsrApp],
        ),
        vector(
            "form_submission_spike",
            "Burst of form submissions from the client",
            &["forms", "ui", "api"],
            0.7,
            Traffic,
            &[StaticSpa, SsrApp, FullStack],
        ),
        vector(
            "service_outage",
            "A downstream service becomes unavailable",
            &["services"],
            0.75,
            Dependency,
            &[Microservices, BackendApi, RestApi, FullStack],
        ),
        vector(
            "public_api_change",
            "A breaking change to the public surface ripples to callers",
            &["unknown", "utils"],
            0.6,
            Dependency,
            &[Library, CliTool],
        ),
    ]
});

/// Every built-in scenario, in catalog order.
pub fn catalog() -> &'static [StressVector] {
    &CATALOG
}

pub fn get(name: &str) -> Option<&'static StressVector> {
    CATALOG.iter().find(|v| v.name == name)
}

/// Scenarios whose architecture set contains `architecture` or the
/// `unknown` wildcard.
pub fn get_applicable_scenarios(architecture: ArchitectureType) -> Vec<&'static StressVector> {
    CATALOG.iter().filter(|v| v.applies_to(architecture)).collect()
}
