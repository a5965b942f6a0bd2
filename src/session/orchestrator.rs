//! Session orchestration.
//!
//! One [`SessionOrchestrator`] per call attempt. It owns the capability
//! registry, the signaling client, and handles to the external peer
//! connection and media provider, drives the setup sequence, and routes
//! inbound control frames.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capabilities::CapabilityRegistry;
use crate::config::SessionOptions;
use crate::error::{AgentError, AgentResult};
use crate::session::peer::{MediaProvider, PeerConnection, PeerEvent};
use crate::signaling::{SignalingClient, SignalingHandler, SignalingMessage, SignalingState};
use realtime_protocol::{decode, encode, ControlMessage, SessionUpdateConfig};

/// Callback invoked with transcript text surfaced from the control channel.
pub type TranscriptCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Drives one voice-agent session end to end.
pub struct SessionOrchestrator {
    options: SessionOptions,
    registry: Arc<CapabilityRegistry>,
    signaling: SignalingClient,
    peer: Arc<dyn PeerConnection>,
    media: Arc<dyn MediaProvider>,
    transcript_callback: Option<TranscriptCallback>,
    started: bool,
}

impl SessionOrchestrator {
    pub fn new(
        options: SessionOptions,
        registry: Arc<CapabilityRegistry>,
        peer: Arc<dyn PeerConnection>,
        media: Arc<dyn MediaProvider>,
    ) -> Self {
        let signaling = SignalingClient::new(options.clone());
        Self {
            options,
            registry,
            signaling,
            peer,
            media,
            transcript_callback: None,
            started: false,
        }
    }

    /// Observe signaling lifecycle events (ICE role, connected, answer,
    /// closed).
    pub fn set_signaling_handler(&mut self, handler: Arc<dyn SignalingHandler>) {
        self.signaling.set_handler(handler);
    }

    /// Register the sink for transcript text.
    pub fn on_transcript(&mut self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.transcript_callback = Some(Arc::new(callback));
    }

    pub fn signaling_state(&self) -> SignalingState {
        self.signaling.state()
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Run the session setup sequence.
    ///
    /// Opens the peer connection and media pipeline, acquires the signaling
    /// credential, offers the local description, and applies the answer.
    /// Failures are fatal to startup and surface to the caller; nothing is
    /// retried here.
    pub async fn start(&mut self) -> AgentResult<()> {
        self.options.validate()?;

        self.peer
            .open()
            .await
            .map_err(|err| AgentError::Config(format!("peer connection failed to open: {err}")))?;
        self.media
            .start()
            .await
            .map_err(|err| AgentError::Config(format!("media provider failed to start: {err}")))?;

        self.signaling.start().await?;

        let offer = self.peer.local_description().await.map_err(|err| {
            AgentError::Config(format!("peer connection yielded no local description: {err}"))
        })?;
        self.signaling
            .send(SignalingMessage::LocalDescription(offer))
            .await?;

        if let Some(answer) = self.signaling.remote_description() {
            let answer = answer.to_string();
            self.peer.set_remote_description(answer).await.map_err(|err| {
                AgentError::Config(format!("peer connection rejected remote description: {err}"))
            })?;
        }

        self.started = true;
        info!("session setup complete");
        Ok(())
    }

    /// React to one peer-connection event.
    pub async fn handle_peer_event(&mut self, event: PeerEvent) -> AgentResult<()> {
        match event {
            PeerEvent::Connected => {
                debug!("peer transport connected");
                Ok(())
            }
            PeerEvent::DataChannelConnected => {
                // The remote side does not create the control channel; ask
                // the transport for one with the expected label.
                info!(label = %self.options.channel_label, "creating control channel");
                self.peer
                    .create_data_channel(&self.options.channel_label)
                    .await
            }
            PeerEvent::DataChannelOpened => {
                // Session config must land before the first response so the
                // voice, instructions, and tools apply to it.
                self.send_session_update().await?;
                let greeting = self.options.greeting.clone();
                self.send_assistant_prompt(greeting).await
            }
            PeerEvent::CustomData(data) => {
                self.handle_custom_data(&data);
                Ok(())
            }
            PeerEvent::Disconnected => {
                info!("peer transport disconnected");
                Ok(())
            }
        }
    }

    /// Inject a user text message into the conversation.
    pub async fn send_user_text(&self, text: impl Into<String>) -> AgentResult<()> {
        self.send_message(&ControlMessage::user_message(text)).await
    }

    /// Ask the model to speak, steered by `instructions`.
    pub async fn send_assistant_prompt(&self, instructions: impl Into<String>) -> AgentResult<()> {
        self.send_message(&ControlMessage::response_create(instructions))
            .await
    }

    /// Enable or disable outbound audio capture (e.g. mute).
    pub async fn set_audio_enabled(&self, enabled: bool) -> AgentResult<()> {
        self.media.set_audio_enabled(enabled).await
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Tear the session down. Safe to call more than once.
    pub async fn stop(&mut self) {
        if let Err(err) = self.media.stop().await {
            warn!(error = %err, "media provider failed to stop");
        }
        self.signaling.stop();
        if let Err(err) = self.peer.close().await {
            warn!(error = %err, "peer connection failed to close");
        }
        self.started = false;
    }

    async fn send_session_update(&self) -> AgentResult<()> {
        let session = SessionUpdateConfig::new(
            self.options.voice.clone(),
            self.options.instructions.clone(),
            self.options.eagerness,
            self.registry.schema(),
        );
        self.send_message(&ControlMessage::session_update(session))
            .await
    }

    fn handle_custom_data(&self, data: &[u8]) {
        let Ok(text) = std::str::from_utf8(data) else {
            warn!(bytes = data.len(), "dropping non-UTF-8 control frame");
            return;
        };
        let message = decode(text);
        if let Some((name, arguments)) = message.function_call() {
            info!(call = name, "dispatching remote function call");
            self.registry.dispatch(name, arguments);
            return;
        }
        if let Some(transcript) = message.transcript() {
            if let Some(callback) = &self.transcript_callback {
                callback(transcript);
            }
            return;
        }
        match message {
            ControlMessage::Error { error } => {
                warn!(
                    error_type = %error.error_type,
                    detail = %error.message,
                    "service reported an error"
                );
            }
            other => debug!(message_type = other.event_type(), "ignoring control frame"),
        }
    }

    async fn send_message(&self, message: &ControlMessage) -> AgentResult<()> {
        let frame = encode(message)?;
        debug!(message_type = message.event_type(), "sending control frame");
        self.peer
            .send_custom_data(frame.as_bytes())
            .await
            .map_err(|err| {
                AgentError::Channel(format!("failed to send {}: {err}", message.event_type()))
            })
    }
}
