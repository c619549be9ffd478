//! Failures talking to the study backend.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, …).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but its body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-success status, or a payload carrying an `error` field.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no details"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid email or password.")]
    Auth,

    /// Downloaded bytes could not be written to disk.
    #[error("Could not save file: {0}")]
    Io(#[from] std::io::Error),

    /// The generation has no id, so it cannot be addressed.
    #[error("This generation was not saved on the server.")]
    NotSaved,
}

impl ApiError {
    /// Text for the message area.  `action` names what failed
    /// (e.g. `"Generation"`) and is used when the server gave no text.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Transport(_) | ApiError::Decode(_) => {
                format!("{action} failed. Try again.")
            }
            ApiError::Server {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Server { message: None, .. } => format!("{action} failed."),
            ApiError::Auth | ApiError::NotSaved | ApiError::Io(_) => self.to_string(),
        }
    }

    /// Whether this failure should be logged as an error (as opposed to an
    /// expected application-level refusal).
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Io(_)
        )
    }
}
