use thiserror::Error;

/// Failures reported by the tracking or scene engine.
/// Empty hit-tests and missing camera poses are not errors; callers get `Vec`/`Option`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("tracking configuration rejected: {0}")]
    UnsupportedConfiguration(String),
    #[error("scene object '{0}' could not be instantiated")]
    Instantiate(String),
}

/// Loading the hoop model bundle. Always fatal at startup.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset bundle {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset bundle {path}: {message}")]
    Parse { path: String, message: String },
    #[error("object '{name}' not found in asset bundle {path}")]
    MissingObject { name: String, path: String },
    #[error("object '{name}' in {path} is invalid: {reason}")]
    Invalid {
        name: String,
        path: String,
        reason: String,
    },
}
