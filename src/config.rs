//! Session configuration.
//!
//! [`SessionOptions`] gathers everything one call needs: the API key that
//! buys the ephemeral credential, the model and voice, the system
//! instructions, VAD eagerness, and the two service endpoints. Defaults match
//! the public realtime service.

use url::Url;

use crate::error::{AgentError, AgentResult};
use realtime_protocol::VadEagerness;

/// Default realtime model.
pub const DEFAULT_MODEL: &str = "gpt-realtime";
/// Default ephemeral-credential endpoint.
pub const DEFAULT_CREDENTIAL_ENDPOINT: &str = "https://api.openai.com/v1/realtime/sessions";
/// Default call endpoint; the model is appended as a query parameter.
pub const DEFAULT_CALL_ENDPOINT: &str = "https://api.openai.com/v1/realtime/calls";
/// Label the remote agent expects on the control channel.
pub const DEFAULT_CHANNEL_LABEL: &str = "oai-events";

/// Configuration for one voice-agent session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// API key used to obtain the ephemeral credential. May be empty when
    /// the credential endpoint does its own authentication.
    pub api_key: String,
    pub model: String,
    pub voice: String,
    pub instructions: String,
    pub eagerness: VadEagerness,
    pub credential_endpoint: String,
    pub call_endpoint: String,
    /// Control-channel label requested when the remote side does not create
    /// the channel itself.
    pub channel_label: String,
    /// Prompt for the first assistant turn once the channel opens.
    pub greeting: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            voice: "marin".to_string(),
            instructions: String::new(),
            eagerness: VadEagerness::Low,
            credential_endpoint: DEFAULT_CREDENTIAL_ENDPOINT.to_string(),
            call_endpoint: DEFAULT_CALL_ENDPOINT.to_string(),
            channel_label: DEFAULT_CHANNEL_LABEL.to_string(),
            greeting: "How can I help?".to_string(),
        }
    }
}

impl SessionOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_eagerness(mut self, eagerness: VadEagerness) -> Self {
        self.eagerness = eagerness;
        self
    }

    pub fn with_credential_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.credential_endpoint = endpoint.into();
        self
    }

    pub fn with_call_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.call_endpoint = endpoint.into();
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Call endpoint with the session model attached.
    pub fn call_url(&self) -> String {
        format!("{}?model={}", self.call_endpoint, self.model)
    }

    /// Both endpoints must be absolute URLs.
    pub fn validate(&self) -> AgentResult<()> {
        for (name, endpoint) in [
            ("credential endpoint", &self.credential_endpoint),
            ("call endpoint", &self.call_endpoint),
        ] {
            Url::parse(endpoint)
                .map_err(|err| AgentError::Config(format!("invalid {name} '{endpoint}': {err}")))?;
        }
        Ok(())
    }
}
