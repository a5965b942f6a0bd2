//! Session configuration types for the control plane.
//!
//! These are the payload types for `session.update`: modalities, voice,
//! instructions, turn detection, and the tool definitions generated from the
//! local capability tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input/output modality for a session or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
}

/// Both modalities, the shape every message in this control plane sends.
pub fn text_and_audio() -> Vec<Modality> {
    vec![Modality::Text, Modality::Audio]
}

/// Turn-taking eagerness for semantic voice-activity detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VadEagerness {
    Low,
    Medium,
    High,
    Auto,
}

/// Turn detection configuration.
///
/// Only semantic VAD is carried here; the service decides turn boundaries
/// from content, with `eagerness` steering how quickly it jumps in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnDetection {
    SemanticVad { eagerness: VadEagerness },
}

impl TurnDetection {
    pub fn semantic_vad(eagerness: VadEagerness) -> Self {
        Self::SemanticVad { eagerness }
    }
}

/// Input audio transcription settings.
///
/// The session update always carries this field; `None` serializes as an
/// explicit `null`, which tells the service to leave transcription off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTranscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A tool exposed to the remote agent.
///
/// Function tools carry a JSON Schema for their parameters; the schema is
/// generated from the local capability tree, never written by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolDefinition {
    #[serde(rename = "function")]
    Function {
        name: String,
        description: String,
        parameters: Value,
    },
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self::Function {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function { name, .. } => name,
        }
    }
}

/// Payload of a `session.update` message.
///
/// Matches the legacy wire shape the call endpoint expects: flat fields,
/// `input_audio_transcription` present even when null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdateConfig {
    pub modalities: Vec<Modality>,
    /// Serialized even when `None` (as `null`).
    pub input_audio_transcription: Option<AudioTranscription>,
    pub voice: String,
    pub instructions: String,
    pub turn_detection: TurnDetection,
    pub tools: Vec<ToolDefinition>,
}

impl SessionUpdateConfig {
    /// Text+audio session with semantic VAD and the given tool set.
    pub fn new(
        voice: impl Into<String>,
        instructions: impl Into<String>,
        eagerness: VadEagerness,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            modalities: text_and_audio(),
            input_audio_transcription: None,
            voice: voice.into(),
            instructions: instructions.into(),
            turn_detection: TurnDetection::semantic_vad(eagerness),
            tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_update_wire_shape() {
        let config = SessionUpdateConfig::new("marin", "Be helpful", VadEagerness::Low, vec![]);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["modalities"], json!(["text", "audio"]));
        assert_eq!(value["input_audio_transcription"], Value::Null);
        assert_eq!(value["voice"], "marin");
        assert_eq!(
            value["turn_detection"],
            json!({"type": "semantic_vad", "eagerness": "low"})
        );
        assert_eq!(value["tools"], json!([]));
    }

    #[test]
    fn test_function_tool_serialization() {
        let tool = ToolDefinition::function(
            "SetVolume",
            "Changes speaker volume",
            json!({"type": "object", "properties": {}}),
        );
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["name"], "SetVolume");
        assert_eq!(value["description"], "Changes speaker volume");
        assert_eq!(value["parameters"]["type"], "object");
    }

    #[test]
    fn test_eagerness_wire_form() {
        assert_eq!(
            serde_json::to_string(&VadEagerness::Medium).unwrap(),
            "\"medium\""
        );
    }
}
