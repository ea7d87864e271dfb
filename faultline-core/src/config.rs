use std::path::Path;

use serde::{Deserialize, Serialize};

pub use faultline_graphs::MetricsConfig;

use crate::detect::CandidatePatterns;
use crate::error::{ConfigError, Result};

/// Default config file name looked up next to a snapshot.
pub const CONFIG_FILE_NAME: &str = "faultline.toml";

/// Top-level Faultline configuration, matching `faultline.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaultlineConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub detection: DetectionSection,
    #[serde(default)]
    pub stress: StressSection,
    #[serde(default)]
    pub renderers: RenderersSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Rewrite raw import specifiers to file keys before computing metrics.
    pub resolve_imports: bool,
    pub include_hypotheses: bool,
    pub include_assumptions: bool,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            resolve_imports: true,
            include_hypotheses: true,
            include_assumptions: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    pub framework_threshold: f64,
    pub database_threshold: f64,
    pub orm_threshold: f64,
    /// Appended after the built-in tables; built-ins win ties.
    pub extra_frameworks: Vec<CandidatePatterns>,
    pub extra_databases: Vec<CandidatePatterns>,
    pub extra_orms: Vec<CandidatePatterns>,
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            framework_threshold: 0.3,
            database_threshold: 0.3,
            orm_threshold: 0.4,
            extra_frameworks: Vec::new(),
            extra_databases: Vec::new(),
            extra_orms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StressSection {
    pub max_depth: usize,
    pub max_affected_files: usize,
    pub max_bottleneck_files: usize,
    pub max_recommendations: usize,
    /// Catalog entries to run; empty runs every applicable one.
    pub scenarios: Vec<String>,
    /// Run vectors on the rayon pool.
    pub parallel: bool,
}

impl Default for StressSection {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_affected_files: 20,
            max_bottleneck_files: 10,
            max_recommendations: 6,
            scenarios: Vec::new(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderersSection {
    pub enabled: Vec<String>,
}

impl Default for RenderersSection {
    fn default() -> Self {
        Self {
            enabled: vec!["markdown".into(), "json".into()],
        }
    }
}

const MAX_STRESS_DEPTH: usize = 32;

impl FaultlineConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("detection.framework_threshold", self.detection.framework_threshold),
            ("detection.database_threshold", self.detection.database_threshold),
            ("detection.orm_threshold", self.detection.orm_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be in [0, 1], got {value}")).into());
            }
        }
        if self.metrics.coupling_calibration <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "metrics.coupling_calibration must be positive, got {}",
                self.metrics.coupling_calibration
            ))
            .into());
        }
        if self.stress.max_depth > MAX_STRESS_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "stress.max_depth must be at most {MAX_STRESS_DEPTH}, got {}",
                self.stress.max_depth
            ))
            .into());
        }
        Ok(())
    }
}
