//! Control-plane wire types for realtime voice-agent sessions.
//!
//! The voice service carries its control plane as JSON text frames on a
//! reliable data channel layered over the peer connection. This crate
//! defines:
//!
//! - **Control messages**: the discriminated union exchanged on the channel,
//!   discriminated by the `type` field ([`ControlMessage`])
//! - **Session types**: the `session.update` payload, turn detection, and
//!   tool definitions
//! - **Conversation types**: message items and content parts
//! - **Response types**: `response.create` parameters and service errors
//!
//! # Codec
//!
//! [`encode`] turns a message into a wire frame; [`decode`] is total —
//! malformed JSON, unknown `type` tags, and truncated payloads all decode to
//! [`ControlMessage::Unknown`] rather than an error, so a misbehaving remote
//! can never tear down the session from the parsing side.
//!
//! ```rust
//! use realtime_protocol::{decode, encode, ControlMessage};
//!
//! let msg = ControlMessage::user_message("turn on the light");
//! let frame = encode(&msg).unwrap();
//! assert_eq!(decode(&frame), msg);
//!
//! // Garbage never errors:
//! assert_eq!(decode("{nope"), ControlMessage::Unknown);
//! ```

pub mod conversation;
pub mod events;
pub mod response;
pub mod session;

pub use conversation::{ContentPart, ConversationItem, Role};
pub use events::{decode, encode, scan_transcript, ControlMessage};
pub use response::{ApiError, ResponseParams};
pub use session::{
    AudioTranscription, Modality, SessionUpdateConfig, ToolDefinition, TurnDetection, VadEagerness,
};
