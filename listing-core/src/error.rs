use std::path::PathBuf;
use thiserror::Error;

/// Errors raised anywhere in the submission pipeline.
///
/// Every variant except [`ListingError::Network`] raised by a lookup is fatal
/// for the run; the registry client decides which failures it absorbs.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Failed to parse manifest {}: {reason}", .path.display())]
    ManifestParse { path: PathBuf, reason: String },

    #[error(
        "No supported manifest found in {}\n\nExpected one of:\n  • package.json\n  • pyproject.toml\n  • Cargo.toml",
        .dir.display()
    )]
    ManifestNotFound { dir: PathBuf },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation failed with {} error(s):\n{}", .errors.len(), bullet_list(.errors))]
    Validation { errors: Vec<String> },

    #[error("{count} validation warning(s) found and fail-on-warning is enabled")]
    Warnings { count: usize },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Registry responded with HTTP {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("Unexpected registry response: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ListingError {
    /// Whether the failure happened before the request reached the registry.
    pub fn is_transport(&self) -> bool {
        matches!(self, ListingError::Network(_))
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  • {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, ListingError>;
