//! One-shot HTTP signaling for a single call attempt.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SessionOptions;
use crate::error::{AgentError, AgentResult};
use crate::signaling::broker::{CredentialBroker, EphemeralToken};

/// Lifecycle of a signaling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Idle,
    AwaitingCredential,
    AwaitingAnswer,
    Active,
    Failed,
    Closed,
}

impl SignalingState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingCredential => "awaiting-credential",
            Self::AwaitingAnswer => "awaiting-answer",
            Self::Active => "active",
            Self::Failed => "failed",
            Self::Closed => "closed",
        }
    }
}

/// Events delivered through the registered [`SignalingHandler`].
///
/// Each event fires at most once per session.
#[derive(Debug, Clone)]
pub enum SignalingEvent {
    /// Which side drives connectivity establishment.
    IceRole { initiator: bool },
    /// Signaling considers itself connected. Emitted right after the
    /// credential arrives, before any remote description exists — see
    /// the note on [`SignalingClient::start`].
    Connected,
    /// The remote session description from the call endpoint.
    RemoteDescription(String),
    /// Signaling shut down.
    Closed,
}

/// Receives signaling events. Register with
/// [`SignalingClient::set_handler`].
pub trait SignalingHandler: Send + Sync {
    fn on_event(&self, event: SignalingEvent);
}

/// Message handed to [`SignalingClient::send`].
#[derive(Debug, Clone)]
pub enum SignalingMessage {
    /// Session teardown notice. The call endpoint has no BYE exchange, so
    /// this is a no-op.
    Bye,
    /// The local session description to offer.
    LocalDescription(String),
}

/// Drives credential acquisition and the offer/answer exchange for exactly
/// one call attempt.
///
/// `start` and `send` issue their HTTP requests on the caller's task and do
/// not return until the exchange finishes; there is no internal retry or
/// reconnection. [`stop`](Self::stop) cancels whatever is in flight and
/// discards late responses.
pub struct SignalingClient {
    options: SessionOptions,
    broker: CredentialBroker,
    http: reqwest::Client,
    state: SignalingState,
    token: Option<EphemeralToken>,
    remote_description: Option<String>,
    handler: Option<Arc<dyn SignalingHandler>>,
    cancel: CancellationToken,
}

impl SignalingClient {
    pub fn new(options: SessionOptions) -> Self {
        let http = reqwest::Client::new();
        Self {
            options,
            broker: CredentialBroker::new(http.clone()),
            http,
            state: SignalingState::Idle,
            token: None,
            remote_description: None,
            handler: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn set_handler(&mut self, handler: Arc<dyn SignalingHandler>) {
        self.handler = Some(handler);
    }

    pub fn state(&self) -> SignalingState {
        self.state
    }

    /// The stored remote description, once the answer has arrived.
    pub fn remote_description(&self) -> Option<&str> {
        self.remote_description.as_deref()
    }

    /// Token that cancels in-flight signaling requests when
    /// [`stop`](Self::stop) runs. Clone it to observe shutdown elsewhere.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Acquire the ephemeral credential and arm the offer/answer exchange.
    ///
    /// On success this eagerly reports `IceRole { initiator: true }` and
    /// `Connected` — before any remote description exists. The upstream
    /// service behaves this way (optimistic feedback as soon as the
    /// credential is in hand); consumers must not read `Connected` as
    /// "media-ready".
    pub async fn start(&mut self) -> AgentResult<()> {
        if self.state != SignalingState::Idle {
            return Err(AgentError::InvalidState {
                expected: "idle",
                actual: self.state.name(),
            });
        }
        self.state = SignalingState::AwaitingCredential;

        let fetched = tokio::select! {
            result = self.broker.fetch_token(&self.options) => result,
            _ = self.cancel.cancelled() => {
                debug!("credential request cancelled by stop");
                return Err(AgentError::transport("signaling stopped"));
            }
        };
        match fetched {
            Ok(token) => {
                self.token = Some(token);
                self.state = SignalingState::AwaitingAnswer;
                info!("ephemeral credential acquired");
                self.emit(SignalingEvent::IceRole { initiator: true });
                self.emit(SignalingEvent::Connected);
                Ok(())
            }
            Err(err) => {
                self.state = SignalingState::Failed;
                error!(error = %err, "credential acquisition failed");
                Err(AgentError::NotSupported(
                    "credential endpoint yielded no token",
                ))
            }
        }
    }

    /// Send a signaling message.
    ///
    /// A local description is POSTed to the call endpoint as raw SDP; the
    /// raw SDP answer is stored, the state moves to `Active`, and the
    /// answer is delivered synchronously through the handler before this
    /// returns. On transport failure the state and stored description are
    /// untouched and the error surfaces to the caller; there is no retry.
    pub async fn send(&mut self, message: SignalingMessage) -> AgentResult<()> {
        let sdp = match message {
            SignalingMessage::Bye => return Ok(()),
            SignalingMessage::LocalDescription(sdp) => sdp,
        };
        if self.state != SignalingState::AwaitingAnswer {
            return Err(AgentError::InvalidState {
                expected: "awaiting-answer",
                actual: self.state.name(),
            });
        }
        let token = self.token.as_ref().ok_or(AgentError::InvalidState {
            expected: "awaiting-answer",
            actual: "no credential",
        })?;

        let url = self.options.call_url();
        debug!(url = %url, "posting local description");
        let request = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", token.secret()))
            .header("Content-Type", "application/sdp")
            .header("Accept", "application/sdp")
            .header("Accept-Encoding", "identity")
            .header("Connection", "close")
            .header("User-Agent", "realtime-voice-agent")
            .header("OpenAI-Beta", "realtime=v1")
            .body(sdp);

        let response = tokio::select! {
            result = request.send() => result.map_err(|err| {
                AgentError::transport(format!("call endpoint unreachable: {err}"))
            })?,
            _ = self.cancel.cancelled() => {
                debug!("offer/answer exchange cancelled by stop");
                return Err(AgentError::transport("signaling stopped"));
            }
        };
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "call endpoint rejected local description");
            return Err(AgentError::transport_status(
                status.as_u16(),
                "call endpoint rejected local description",
            ));
        }
        let answer = response.text().await?;
        if answer.trim().is_empty() {
            warn!(url = %url, "call endpoint returned an empty remote description");
            return Err(AgentError::transport("empty remote description"));
        }

        info!(bytes = answer.len(), "remote description received");
        self.remote_description = Some(answer.clone());
        self.state = SignalingState::Active;
        self.emit(SignalingEvent::RemoteDescription(answer));
        Ok(())
    }

    /// Tear down signaling from any state.
    ///
    /// Cancels in-flight requests (late responses are discarded), releases
    /// the credential and the stored remote description, and emits `Closed`
    /// exactly once.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.token = None;
        self.remote_description = None;
        if self.state != SignalingState::Closed {
            self.state = SignalingState::Closed;
            self.emit(SignalingEvent::Closed);
        }
    }

    fn emit(&self, event: SignalingEvent) {
        if let Some(handler) = &self.handler {
            handler.on_event(event);
        }
    }
}
