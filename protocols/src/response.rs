//! Response parameters and service error shapes.

use serde::{Deserialize, Serialize};

use crate::session::{text_and_audio, Modality};

/// Parameters of a `response.create` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseParams {
    pub modalities: Vec<Modality>,
    pub instructions: String,
}

impl ResponseParams {
    /// Text+audio response steered by `instructions`.
    pub fn with_instructions(instructions: impl Into<String>) -> Self {
        Self {
            modalities: text_and_audio(),
            instructions: instructions.into(),
        }
    }
}

/// Error detail carried by an inbound `error` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}
