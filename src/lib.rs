//! Session control plane for realtime voice-agent calls.
//!
//! This crate establishes and drives a voice-agent session between a local
//! endpoint and a cloud conversational service over a peer-to-peer realtime
//! transport. It covers the control plane only:
//!
//! - **Signaling** ([`signaling`]): a short-lived bearer credential is
//!   acquired from the credential endpoint, then the local session
//!   description is exchanged for the remote one in a single HTTP
//!   offer/answer round.
//! - **Control channel** ([`realtime_protocol`]): JSON messages on the
//!   reliable data channel — session updates, response requests, user text,
//!   function calls, transcripts.
//! - **Capabilities** ([`capabilities`]): a declarative tree of local
//!   actions exposed to the remote agent as function tools with generated
//!   schemas, with safe dispatch of remote invocations.
//! - **Orchestration** ([`session`]): one [`SessionOrchestrator`] per call
//!   composes the above with the external peer connection and media
//!   provider.
//! - **Wake word** ([`wakeword`]): the front-end pump that feeds capture
//!   frames into an acoustic detector.
//!
//! The transport itself (connection establishment, media), the audio
//! pipeline, and the acoustic wake-word model are external collaborators
//! behind the traits in [`session::peer`] and [`wakeword`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use voice_agent::{
//!     Attribute, AttributeUpdate, Capability, CapabilityRegistry,
//!     SessionOptions, SessionOrchestrator,
//! };
//!
//! let mut registry = CapabilityRegistry::new();
//! registry.build(vec![
//!     Capability::new("SetVolume", "Changes speaker volume").attribute(
//!         Attribute::int("volume", "Speaker volume range 0-100")
//!             .required()
//!             .on_change(|update| {
//!                 if let AttributeUpdate::Int(volume) = update {
//!                     println!("volume set to {volume}");
//!                 }
//!             }),
//!     ),
//! ]);
//!
//! let options = SessionOptions::new(std::env::var("API_KEY")?);
//! let mut session =
//!     SessionOrchestrator::new(options, Arc::new(registry), peer, media);
//! session.start().await?;
//! ```

pub mod capabilities;
pub mod config;
pub mod error;
pub mod session;
pub mod signaling;
pub mod wakeword;

pub use capabilities::{Attribute, AttributeHandler, AttributeUpdate, Capability, CapabilityRegistry};
pub use config::SessionOptions;
pub use error::{AgentError, AgentResult};
pub use session::{MediaProvider, PeerConnection, PeerEvent, SessionOrchestrator, TranscriptCallback};
pub use signaling::{
    CredentialBroker, EphemeralToken, SignalingClient, SignalingEvent, SignalingHandler,
    SignalingMessage, SignalingState,
};
pub use wakeword::{
    Detection, DetectionCallback, FrameSource, WakeWordConfig, WakeWordEngine, WakeWordHandler,
};

// The wire types travel with the client API.
pub use realtime_protocol as protocol;
