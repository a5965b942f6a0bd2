//! Control messages and the channel codec.
//!
//! Every frame on the reliable channel is a JSON object discriminated by its
//! `type` field. Outbound messages (session updates, response requests, user
//! text) and the inbound messages this client reacts to (function call
//! completions, transcripts, errors) share one union; everything else the
//! service may send collapses into [`ControlMessage::Unknown`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::ConversationItem;
use crate::response::{ApiError, ResponseParams};
use crate::session::SessionUpdateConfig;

/// A control-plane message, discriminated by the `type` wire field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Reconfigure the session (voice, instructions, VAD, tools).
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionUpdateConfig },

    /// Ask the model to produce a response.
    #[serde(rename = "response.create")]
    ResponseCreate { response: ResponseParams },

    /// Inject an item into the conversation.
    ///
    /// `previous_item_id` is serialized even when absent (`null` appends at
    /// the end of the conversation).
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate {
        previous_item_id: Option<String>,
        item: ConversationItem,
    },

    /// The model finished streaming arguments for a function call.
    ///
    /// `arguments` is a JSON document encoded as a string.
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone {
        #[serde(skip_serializing_if = "Option::is_none")]
        event_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
        name: String,
        arguments: String,
    },

    /// Final transcript of an audio response.
    #[serde(rename = "response.audio_transcript.done")]
    ResponseAudioTranscriptDone {
        #[serde(skip_serializing_if = "Option::is_none")]
        item_id: Option<String>,
        transcript: String,
    },

    /// Transcription of the user's speech completed.
    #[serde(rename = "conversation.item.input_audio_transcription.completed")]
    InputAudioTranscriptionCompleted {
        #[serde(skip_serializing_if = "Option::is_none")]
        item_id: Option<String>,
        transcript: String,
    },

    /// The service reported an error.
    #[serde(rename = "error")]
    Error { error: ApiError },

    /// Any message type this client does not handle. Never an error.
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    /// A `session.update` message.
    pub fn session_update(session: SessionUpdateConfig) -> Self {
        Self::SessionUpdate { session }
    }

    /// A `response.create` message steered by `instructions`.
    pub fn response_create(instructions: impl Into<String>) -> Self {
        Self::ResponseCreate {
            response: ResponseParams::with_instructions(instructions),
        }
    }

    /// A `conversation.item.create` message carrying one user text message,
    /// appended at the end of the conversation.
    pub fn user_message(text: impl Into<String>) -> Self {
        Self::ConversationItemCreate {
            previous_item_id: None,
            item: ConversationItem::user_text(text),
        }
    }

    /// The wire `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionUpdate { .. } => "session.update",
            Self::ResponseCreate { .. } => "response.create",
            Self::ConversationItemCreate { .. } => "conversation.item.create",
            Self::FunctionCallArgumentsDone { .. } => "response.function_call_arguments.done",
            Self::ResponseAudioTranscriptDone { .. } => "response.audio_transcript.done",
            Self::InputAudioTranscriptionCompleted { .. } => {
                "conversation.item.input_audio_transcription.completed"
            }
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Function call details if this is a completed function call.
    ///
    /// Returns the call name and the JSON-encoded argument string.
    pub fn function_call(&self) -> Option<(&str, &str)> {
        match self {
            Self::FunctionCallArgumentsDone {
                name, arguments, ..
            } => Some((name.as_str(), arguments.as_str())),
            _ => None,
        }
    }

    /// Structural transcript lookup.
    ///
    /// Prefer this over [`scan_transcript`]; it reads the declared field of
    /// the transcript-bearing variants and nothing else.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::ResponseAudioTranscriptDone { transcript, .. }
            | Self::InputAudioTranscriptionCompleted { transcript, .. } => {
                Some(transcript.as_str())
            }
            _ => None,
        }
    }
}

/// Encode a control message as a channel text frame.
pub fn encode(message: &ControlMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

/// Decode a channel text frame.
///
/// Total: malformed JSON, unknown `type` tags, and payloads missing declared
/// fields all decode to [`ControlMessage::Unknown`].
pub fn decode(raw: &str) -> ControlMessage {
    match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(err) => {
            debug!(error = %err, "control frame did not decode, treating as unknown");
            ControlMessage::Unknown
        }
    }
}

/// Best-effort transcript scan over a raw frame.
///
/// Display aid only: finds the first `"transcript":"…"` substring without
/// parsing, and does not honor JSON string escapes. Use
/// [`ControlMessage::transcript`] for anything structural.
pub fn scan_transcript(raw: &str) -> Option<String> {
    let after_key = &raw[raw.find("\"transcript\":")? + "\"transcript\":".len()..];
    let open = after_key.find('"')?;
    let rest = &after_key[open + 1..];
    let close = rest.find('"')?;
    Some(rest[..close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::VadEagerness;
    use serde_json::json;

    #[test]
    fn test_session_update_round_trip() {
        let msg = ControlMessage::session_update(SessionUpdateConfig::new(
            "marin",
            "Be helpful",
            VadEagerness::Low,
            vec![],
        ));
        let frame = encode(&msg).unwrap();
        assert!(frame.contains("\"type\":\"session.update\""));
        assert_eq!(decode(&frame), msg);
    }

    #[test]
    fn test_response_create_round_trip() {
        let msg = ControlMessage::response_create("How can I help?");
        let frame = encode(&msg).unwrap();
        assert!(frame.contains("\"type\":\"response.create\""));
        assert_eq!(decode(&frame), msg);
    }

    #[test]
    fn test_user_message_serializes_null_previous_item() {
        let frame = encode(&ControlMessage::user_message("hi")).unwrap();
        assert!(frame.contains("\"previous_item_id\":null"));
        assert!(frame.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_function_call_done_decodes() {
        let raw = json!({
            "type": "response.function_call_arguments.done",
            "event_id": "evt_1",
            "call_id": "call_1",
            "name": "SetVolume",
            "arguments": "{\"volume\":42}"
        })
        .to_string();
        let msg = decode(&raw);
        assert_eq!(msg.function_call(), Some(("SetVolume", "{\"volume\":42}")));
        assert_eq!(decode(&encode(&msg).unwrap()), msg);
    }

    #[test]
    fn test_transcript_structural_lookup() {
        let raw = json!({
            "type": "response.audio_transcript.done",
            "item_id": "item_1",
            "transcript": "hello there"
        })
        .to_string();
        assert_eq!(decode(&raw).transcript(), Some("hello there"));

        let raw = json!({
            "type": "conversation.item.input_audio_transcription.completed",
            "transcript": "turn it down"
        })
        .to_string();
        assert_eq!(decode(&raw).transcript(), Some("turn it down"));
    }

    #[test]
    fn test_unknown_type_decodes_to_unknown() {
        let msg = decode(r#"{"type":"rate_limits.updated","rate_limits":[]}"#);
        assert_eq!(msg, ControlMessage::Unknown);
        assert_eq!(msg.transcript(), None);
        assert_eq!(msg.function_call(), None);
    }

    #[test]
    fn test_malformed_and_truncated_frames_never_error() {
        assert_eq!(decode("{nope"), ControlMessage::Unknown);
        assert_eq!(decode(""), ControlMessage::Unknown);
        // declared type with a missing payload field
        assert_eq!(decode(r#"{"type":"session.update"}"#), ControlMessage::Unknown);
        assert_eq!(
            decode(r#"{"type":"response.function_call_arguments.done","name":"x"}"#),
            ControlMessage::Unknown
        );
    }

    #[test]
    fn test_error_message_decodes() {
        let raw = json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "code": "bad", "message": "nope"}
        })
        .to_string();
        match decode(&raw) {
            ControlMessage::Error { error } => {
                assert_eq!(error.error_type, "invalid_request_error");
                assert_eq!(error.message, "nope");
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn test_scan_transcript_heuristic() {
        let raw = r#"{"type":"whatever","transcript":"hi there"}"#;
        assert_eq!(scan_transcript(raw).as_deref(), Some("hi there"));
        assert_eq!(scan_transcript(r#"{"type":"x"}"#), None);
    }
}
