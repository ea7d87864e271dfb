/// Top-level Faultline error type.
///
/// Analysis itself is total; only the seams around it (configuration,
/// snapshot loading, rendering, per-candidate pattern scoring) return
/// [`Result<T, FaultlineError>`](Result).
#[derive(thiserror::Error, Debug)]
pub enum FaultlineError {
    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while scoring a detection candidate or building a stress vector.
    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// Error during report rendering.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error loading a repository snapshot.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Errors in Faultline configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors isolated to a single detection candidate or stress vector.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    /// A framework/database/ORM pattern entry cannot be scored.
    #[error("Malformed pattern entry '{candidate}': {reason}")]
    MalformedPattern {
        /// Name of the offending candidate.
        candidate: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An ad hoc stress vector has out-of-range or empty fields.
    #[error("Invalid stress vector: {0}")]
    InvalidVector(String),
}

/// Errors during the rendering pipeline phase.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Output formatting failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Filesystem I/O error writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading a repository snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// Snapshot file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot JSON is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot parsed but is not usable.
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

/// Convenience alias for `Result<T, FaultlineError>`.
pub type Result<T> = std::result::Result<T, FaultlineError>;
