//! Seams to the external realtime transport and media pipeline.
//!
//! Connection establishment, media transport, and the audio pipeline live
//! outside this crate; the orchestrator only needs the operations below.

use async_trait::async_trait;

use crate::error::AgentResult;

/// Lifecycle and channel events surfaced by the peer connection.
///
/// The transport delivers each event at most once per session, on a single
/// callback context at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// Transport connectivity is established.
    Connected,
    /// The channel transport is up but no channel has been announced yet.
    /// The remote side does not create the control channel itself.
    DataChannelConnected,
    /// The reliable control channel is open for frames.
    DataChannelOpened,
    /// A frame arrived on the control channel.
    CustomData(Vec<u8>),
    /// Transport lost or closed.
    Disconnected,
}

/// The peer-to-peer transport, as far as the control plane is concerned.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn open(&self) -> AgentResult<()>;
    async fn close(&self) -> AgentResult<()>;
    /// The local session description to offer.
    async fn local_description(&self) -> AgentResult<String>;
    /// Apply the remote session description from signaling.
    async fn set_remote_description(&self, sdp: String) -> AgentResult<()>;
    /// Create the reliable channel with the given label.
    async fn create_data_channel(&self, label: &str) -> AgentResult<()>;
    /// Send one frame on the reliable channel.
    async fn send_custom_data(&self, data: &[u8]) -> AgentResult<()>;
}

/// The audio/video capture-and-render pipeline.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn start(&self) -> AgentResult<()>;
    async fn stop(&self) -> AgentResult<()>;
    async fn set_audio_enabled(&self, enabled: bool) -> AgentResult<()>;
}
