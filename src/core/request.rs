//! Generation request: built fresh from the form on every generate action.

use serde::Serialize;
use thiserror::Error;

use super::mode::{leading_int, Mode};

/// Input rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a topic.")]
    EmptyTopic,
    #[error("Enter a valid count.")]
    InvalidCount,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub num_items: u32,
    pub mode: Mode,
    pub difficulty: String,
    pub explanations: bool,
}

impl GenerationRequest {
    /// Validate the raw form fields and build a request.
    ///
    /// The topic is trimmed; the count is the leading integer of the field
    /// and must be at least 1.  Explanations are always requested.
    pub fn from_form(
        topic: &str,
        count: &str,
        mode: Mode,
        difficulty: &str,
    ) -> Result<Self, ValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        let num_items = leading_int(count)
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ValidationError::InvalidCount)?;

        Ok(Self {
            topic: topic.to_string(),
            num_items,
            mode,
            difficulty: difficulty.to_string(),
            explanations: true,
        })
    }
}
