use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Download failed for {theme} ({url}): {message}")]
    Download {
        theme: String,
        url: String,
        message: String,
        is_retriable: bool,
    },

    #[error("Extraction failed for {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("{program} exited with {status}")]
    ToolFailed { program: String, status: String },

    #[error("Invalid connection string: {0}")]
    Connection(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("{failed} of {total} item(s) failed")]
    BatchFailed { failed: usize, total: usize },
}

impl GisError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            GisError::Download { is_retriable, .. } => *is_retriable,
            GisError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GisError>;
