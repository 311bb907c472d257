//! Error types for folio operations

use serde::Serialize;

/// Structured error payload shared between service and CLI.
///
/// Used as the HTTP error body in folio-service and as the `--json`
/// error output of the CLI.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: String,
}

impl ErrorEnvelope {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn not_found(slug: &str) -> Self {
        Self::new(
            "not_found",
            format!("No document at '/{}'", slug),
            "Check the path against /api/paths",
        )
    }

    pub fn internal(msg: &str) -> Self {
        Self::new("internal_error", msg, "Check service logs for details")
    }
}

impl From<&FolioError> for ErrorEnvelope {
    fn from(err: &FolioError) -> Self {
        match err {
            FolioError::IndexUnavailable { .. } => Self::new(
                "index_unavailable",
                err.to_string(),
                "Is the content store reachable?",
            ),
            FolioError::MalformedIndex { .. } => Self::new(
                "malformed_index",
                err.to_string(),
                "Fix index.json in the content store",
            ),
            FolioError::ContentUnavailable { .. } => Self::new(
                "content_unavailable",
                err.to_string(),
                "Is the content store reachable?",
            ),
            FolioError::InvalidBaseUrl(_) | FolioError::ConfigParse(_) => {
                Self::new("config_error", err.to_string(), "Check the base URL and config file")
            }
            _ => Self::internal(&err.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("Index unavailable{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    IndexUnavailable {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed index at '{path}': {message}")]
    MalformedIndex { path: String, message: String },

    #[error("Content unavailable at {url}{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    ContentUnavailable {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedIndex {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for failures that leave the caller without a usable index tree.
    ///
    /// `MalformedIndex` propagates exactly like `IndexUnavailable`.
    pub fn is_index_failure(&self) -> bool {
        matches!(
            self,
            Self::IndexUnavailable { .. } | Self::MalformedIndex { .. }
        )
    }
}
