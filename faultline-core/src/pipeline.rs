// Pipeline orchestrator: snapshot → graph → detection → analysis → stress.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

use faultline_graphs::metrics::compute_graph_metrics_with;
use faultline_graphs::{DependencyGraph, GraphMetrics, ImportResolver, build_dependency_graph, normalize_path};

use crate::analyze::{AnalysisInput, Analyzer, Assumption, AssumptionAnalyzer, Hypothesis, HypothesisAnalyzer};
use crate::config::FaultlineConfig;
use crate::detect::{EvidenceIndex, detect_architecture};
use crate::layers::infer_layers;
use crate::snapshot::RepoSnapshot;
use crate::stress::{StressContext, StressResult, StressVector, get_applicable_scenarios, run_stress_test, scenarios};
use crate::types::{ArchitectureDetection, ArchitectureType, Layers};

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub file_count: usize,
    pub graph: DependencyGraph,
    pub metrics: GraphMetrics,
    pub detection: ArchitectureDetection,
    pub layers: Layers,
    pub hypotheses: Vec<Hypothesis>,
    pub assumptions: Vec<Assumption>,
    pub stress_results: Vec<StressResult>,
}

impl AnalysisReport {
    /// Results whose vector could actually run.
    pub fn applicable_results(&self) -> impl Iterator<Item = &StressResult> {
        self.stress_results.iter().filter(|r| r.is_applicable)
    }
}

/// Shared state for stress runs plus the analysis products that do not
/// feed propagation.
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub context: StressContext,
    pub hypotheses: Vec<Hypothesis>,
    pub file_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: FaultlineConfig,
}

impl AnalysisPipeline {
    pub fn new(config: FaultlineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FaultlineConfig {
        &self.config
    }

    /// Full run over `snapshot`.
    #[instrument(skip_all, name = "pipeline_run")]
    pub fn run(&self, snapshot: &RepoSnapshot) -> AnalysisReport {
        let start = Instant::now();
        let prepared = self.prepare(snapshot);
        let vectors = self.select_vectors(prepared.context.detection.architecture_type);
        let stress_results = self.run_vectors(&prepared.context, &vectors);

        info!(
            files = prepared.file_count,
            architecture = %prepared.context.detection.architecture_type,
            vectors = stress_results.len(),
            applicable = stress_results.iter().filter(|r| r.is_applicable).count(),
            duration = ?start.elapsed(),
            "Analysis complete"
        );

        let PreparedAnalysis {
            context,
            hypotheses,
            file_count,
        } = prepared;
        AnalysisReport {
            generated_at: Utc::now(),
            file_count,
            graph: context.graph,
            metrics: context.metrics,
            detection: context.detection,
            layers: context.layers,
            hypotheses,
            assumptions: context.assumptions,
            stress_results,
        }
    }

    /// Every stage up to (not including) stress propagation.
    #[instrument(skip_all, name = "pipeline_prepare")]
    pub fn prepare(&self, snapshot: &RepoSnapshot) -> PreparedAnalysis {
        let files = snapshot.file_list();
        let graph = self.build_graph(snapshot, &files);
        let metrics = compute_graph_metrics_with(&graph, &self.config.metrics);

        let index = EvidenceIndex::new(&files, &snapshot.symbols, &snapshot.contents);
        let detection = detect_architecture(&index, &self.config.detection);
        let layers = infer_layers(graph.files(), detection.archetype);

        let input = AnalysisInput::new(&files, &index, &layers, &metrics, &detection);
        let hypotheses = if self.config.analysis.include_hypotheses {
            HypothesisAnalyzer.analyze(&input)
        } else {
            Vec::new()
        };
        let assumptions = if self.config.analysis.include_assumptions {
            AssumptionAnalyzer.analyze(&input)
        } else {
            Vec::new()
        };

        info!(
            nodes = metrics.total_nodes,
            edges = metrics.total_edges,
            hypotheses = hypotheses.len(),
            assumptions = assumptions.len(),
            "Analysis prepared"
        );

        PreparedAnalysis {
            context: StressContext::new(
                graph,
                metrics,
                layers,
                detection,
                assumptions,
                self.config.stress.clone(),
            ),
            hypotheses,
            file_count: files.len(),
        }
    }

    /// Seed every symbol-bearing file, fold imports, then resolve
    /// specifiers when enabled. File keys are normalized with
    /// [`normalize_path`] so they match what the resolver returns.
    pub fn build_graph(&self, snapshot: &RepoSnapshot, files: &[String]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for file in snapshot.symbol_files() {
            graph.ensure_file(&normalize_path(file));
        }
        for (file, specs) in build_dependency_graph(&snapshot.symbols).iter() {
            let file = normalize_path(file);
            for spec in specs {
                graph.add_import(&file, spec.clone());
            }
        }

        if self.config.analysis.resolve_imports {
            ImportResolver::new(files).resolve_graph(&graph)
        } else {
            graph
        }
    }

    /// Catalog vectors to run for `architecture`: every applicable entry,
    /// or the configured names in catalog order.
    pub fn select_vectors(&self, architecture: ArchitectureType) -> Vec<&'static StressVector> {
        let wanted = &self.config.stress.scenarios;
        if wanted.is_empty() {
            return get_applicable_scenarios(architecture);
        }
        for name in wanted {
            if scenarios::get(name).is_none() {
                warn!(scenario = %name, "Unknown stress scenario in config, skipping");
            }
        }
        scenarios::catalog()
            .iter()
            .filter(|v| wanted.iter().any(|w| *w == v.name))
            .collect()
    }

    /// Run `vectors` against one shared context. Output order follows
    /// input order in both modes.
    pub fn run_vectors<V>(&self, context: &StressContext, vectors: &[V]) -> Vec<StressResult>
    where
        V: AsRef<StressVector> + Sync,
    {
        if self.config.stress.parallel {
            vectors.par_iter().map(|v| run_stress_test(context, v.as_ref())).collect()
        } else {
            vectors.iter().map(|v| run_stress_test(context, v.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use faultline_graphs::SymbolRecord;

    use super::*;

    fn backend_snapshot() -> RepoSnapshot {
        let mut snap = RepoSnapshot::default();
        let imports = [
            ("shop/views.py", "shop.services"),
            ("shop/views.py", "django.http"),
            ("shop/services.py", "shop.models"),
            ("shop/models.py", "django.db"),
        ];
        for (file, spec) in imports {
            snap.symbols.push(SymbolRecord::import(spec, file, "python"));
        }
        snap.symbols.push(SymbolRecord::new(
            "slugify",
            faultline_graphs::SymbolKind::Function,
            "shop/utils.py",
            "python",
        ));
        snap.files = vec![
            "manage.py".into(),
            "requirements.txt".into(),
            "shop/views.py".into(),
            "shop/services.py".into(),
            "shop/models.py".into(),
            "shop/urls.py".into(),
            "shop/settings.py".into(),
            "shop/utils.py".into(),
        ];
        snap.contents.insert("requirements.txt".into(), "django\npsycopg2\n".into());
        snap
    }

    #[test]
    fn graph_seeds_symbol_files_and_resolves() {
        let pipeline = AnalysisPipeline::default();
        let snap = backend_snapshot();
        let graph = pipeline.build_graph(&snap, &snap.file_list());
        assert!(graph.contains("shop/utils.py"));
        assert_eq!(graph.imports("shop/utils.py").map(|s| s.len()), Some(0));
        assert!(graph.imports("shop/views.py").unwrap().contains("shop/services.py"));
        assert!(graph.imports("shop/views.py").unwrap().contains("django.http"));
    }

    #[test]
    fn graph_keys_share_resolver_spelling() {
        let mut snap = RepoSnapshot::default();
        snap.symbols.push(SymbolRecord::import("shop.services", "./shop/views.py", "python"));
        snap.symbols.push(SymbolRecord::import("shop.models", "shop\\services.py", "python"));
        snap.symbols.push(SymbolRecord::new(
            "Order",
            faultline_graphs::SymbolKind::Class,
            "shop/models.py",
            "python",
        ));
        snap.files = vec!["./shop/views.py".into(), "shop\\services.py".into(), "shop/models.py".into()];

        let graph = AnalysisPipeline::default().build_graph(&snap, &snap.file_list());
        let keys: Vec<&str> = graph.files().collect();
        assert_eq!(keys.len(), 3);
        assert!(graph.contains("shop/views.py"));
        assert!(!graph.contains("./shop/views.py"));
        assert!(graph.imports("shop/views.py").unwrap().contains("shop/services.py"));
        assert!(graph.imports("shop/services.py").unwrap().contains("shop/models.py"));

        let metrics = compute_graph_metrics_with(&graph, &FaultlineConfig::default().metrics);
        assert_eq!(metrics.fan_in("shop/services.py"), 1);
    }

    #[test]
    fn raw_specifiers_without_resolution() {
        let mut config = FaultlineConfig::default();
        config.analysis.resolve_imports = false;
        let pipeline = AnalysisPipeline::new(config);
        let snap = backend_snapshot();
        let graph = pipeline.build_graph(&snap, &snap.file_list());
        assert!(graph.imports("shop/views.py").unwrap().contains("shop.services"));
    }

    #[test]
    fn run_produces_full_report() {
        let report = AnalysisPipeline::default().run(&backend_snapshot());
        assert_eq!(report.file_count, 8);
        assert_eq!(report.metrics.total_nodes, 4);
        assert_eq!(report.detection.tech_stack.framework.as_deref(), Some("Django"));
        assert!(!report.stress_results.is_empty());
        let names: Vec<&str> = report.stress_results.iter().map(|r| r.stress.as_str()).collect();
        let expected: Vec<&str> = get_applicable_scenarios(report.detection.architecture_type)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let snap = backend_snapshot();
        let parallel = AnalysisPipeline::default().run(&snap);
        let mut config = FaultlineConfig::default();
        config.stress.parallel = false;
        let sequential = AnalysisPipeline::new(config).run(&snap);
        assert_eq!(parallel.stress_results, sequential.stress_results);
    }

    #[test]
    fn scenario_allow_list_keeps_catalog_order() {
        let mut config = FaultlineConfig::default();
        config.stress.scenarios = vec!["team_scale".into(), "nonexistent".into(), "traffic_spike".into()];
        let pipeline = AnalysisPipeline::new(config);
        let names: Vec<&str> = pipeline
            .select_vectors(ArchitectureType::BackendApi)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["traffic_spike", "team_scale"]);
    }

    #[test]
    fn analyzers_can_be_disabled() {
        let mut config = FaultlineConfig::default();
        config.analysis.include_hypotheses = false;
        config.analysis.include_assumptions = false;
        let report = AnalysisPipeline::new(config).run(&backend_snapshot());
        assert!(report.hypotheses.is_empty());
        assert!(report.assumptions.is_empty());
        assert!(report.stress_results.iter().all(|r| r.violated_assumptions.is_empty()));
    }

    #[test]
    fn empty_snapshot_is_not_an_error() {
        let report = AnalysisPipeline::default().run(&RepoSnapshot::default());
        assert_eq!(report.metrics.total_nodes, 0);
        assert_eq!(report.detection.architecture_type, ArchitectureType::Unknown);
        assert_eq!(report.applicable_results().count(), 0);
    }
}
