//! Ephemeral credential acquisition.

use std::fmt;

use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::SessionOptions;
use crate::error::{AgentError, AgentResult};

/// How much of an unparseable response body to include in logs.
const BODY_PREVIEW_LIMIT: usize = 200;

/// A short-lived bearer credential scoping one call.
///
/// Owned by the signaling client and dropped when the session stops.
#[derive(Clone)]
pub struct EphemeralToken(String);

impl EphemeralToken {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EphemeralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EphemeralToken").field(&"[REDACTED]").finish()
    }
}

/// Acquires ephemeral credentials from the credential endpoint.
#[derive(Debug, Clone)]
pub struct CredentialBroker {
    http: reqwest::Client,
}

impl CredentialBroker {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST for an ephemeral token.
    ///
    /// The request body shape depends on the endpoint: the hosted
    /// `/realtime/sessions` endpoint takes the legacy flat shape, custom
    /// endpoints take the wrapped `{"session":{…}}` shape. The bearer header
    /// is attached only when an API key is configured.
    pub async fn fetch_token(&self, options: &SessionOptions) -> AgentResult<EphemeralToken> {
        let body = credential_request_body(options);
        debug!(endpoint = %options.credential_endpoint, "requesting ephemeral credential");

        let mut request = self
            .http
            .post(&options.credential_endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "text/plain, application/json")
            .header("Accept-Encoding", "identity")
            .header("Connection", "close")
            .header("User-Agent", "realtime-voice-agent")
            .header("OpenAI-Beta", "realtime=v1")
            .json(&body);
        if !options.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", options.api_key));
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        match parse_token_body(&text) {
            Some(token) => Ok(EphemeralToken(token)),
            None => {
                let preview: String = text.trim().chars().take(BODY_PREVIEW_LIMIT).collect();
                error!(
                    status = status.as_u16(),
                    preview, "failed to parse ephemeral credential"
                );
                Err(AgentError::Credential(format!(
                    "no token in credential response (status {status})"
                )))
            }
        }
    }
}

/// Build the credential request body for the configured endpoint.
fn credential_request_body(options: &SessionOptions) -> Value {
    if options.credential_endpoint.contains("/realtime/sessions") {
        let mut body = json!({
            "model": options.model,
            "modalities": ["text", "audio"],
            "voice": options.voice,
        });
        if !options.instructions.is_empty() {
            body["instructions"] = Value::String(options.instructions.clone());
        }
        body
    } else {
        let mut session = json!({
            "model": options.model,
            "audio": {"output": {"voice": options.voice}},
        });
        if !options.instructions.is_empty() {
            session["instructions"] = Value::String(options.instructions.clone());
        }
        json!({ "session": session })
    }
}

/// Pull a token out of a credential response body.
///
/// Ordered probes: `client_secret.value`, then top-level `value`, then
/// top-level `secret`; a non-JSON body is taken as the token itself, with
/// one pair of surrounding quotes stripped. Empty results are `None`.
fn parse_token_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        let root: Value = serde_json::from_str(trimmed).ok()?;
        return [
            root.pointer("/client_secret/value"),
            root.get("value"),
            root.get("secret"),
        ]
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string);
    }
    let token = match trimmed.strip_prefix('"') {
        Some(rest) => match rest.find('"') {
            Some(end) => &rest[..end],
            None => rest,
        },
        None => trimmed,
    };
    (!token.is_empty()).then(|| token.to_string())
}
