//! Error types for the screening client.

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Why a question was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReadyReason {
    /// No analysis exists yet, or a new upload has invalidated it
    NoAnalysis,
    /// The previous question has not been answered
    AnswerPending,
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotReadyReason::NoAnalysis => write!(f, "no analysis available"),
            NotReadyReason::AnswerPending => write!(f, "an answer is still pending"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    /// Upload attempted without both documents selected.
    #[error("validation error: {0}")]
    Validation(String),

    /// Question attempted before the conversation can accept it.
    #[error("chat not ready: {0}")]
    NotReady(NotReadyReason),

    /// Network failure, including request timeouts.
    #[error("HTTP error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Backend answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Backend answered 2xx but the body is unusable.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// A selected file could not be read from disk.
    #[error("could not read {path:?}: {source}")]
    Document {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ScreenerError {
    /// Text shown to the user in a blocking notice
    pub fn notice(&self) -> String {
        match self {
            ScreenerError::Validation(msg) => msg.clone(),
            ScreenerError::NotReady(NotReadyReason::NoAnalysis) => {
                "Upload resume + JD first to enable RAG chat.".to_string()
            }
            ScreenerError::NotReady(NotReadyReason::AnswerPending) => {
                "Wait for the current answer before asking again.".to_string()
            }
            ScreenerError::Transport { .. }
            | ScreenerError::Status { .. }
            | ScreenerError::MalformedResponse { .. } => {
                "Request failed. Check backend terminal for errors.".to_string()
            }
            ScreenerError::Document { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
        }
    }

    /// True for failures reported by or on the way to the backend
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ScreenerError::Transport { .. }
                | ScreenerError::Status { .. }
                | ScreenerError::MalformedResponse { .. }
        )
    }
}
