//! Completion relay.
//!
//! Forwards a composed chat turn to the remote OpenAI-compatible
//! chat/completions API in a single synchronous round trip, validates the
//! response shape, and maps transport failures to a typed taxonomy. No
//! retries: the caller decides whether to resubmit.

use std::sync::OnceLock;
use std::time::Duration;

use patchbay_types::{ChatMessage, ToolDeclaration};
use serde_json::{Value, json};

/// Default upstream endpoint.
pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.studio.nebius.ai/v1/chat/completions";

/// Sampling temperature applied when the client omits one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Completion token budget applied when the client omits one.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build relay HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Failures surfaced by the relay.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("upstream API error {status}: {body}")]
    UpstreamHttp { status: u16, body: String },
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),
    #[error("malformed completion response: {0}")]
    MalformedResponse(&'static str),
}

/// One chat turn to relay upstream.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub tools: Option<&'a [ToolDeclaration]>,
    /// Defaults to [`DEFAULT_TEMPERATURE`] when `None`.
    pub temperature: Option<f64>,
    /// Defaults to [`DEFAULT_MAX_TOKENS`] when `None`.
    pub max_tokens: Option<u32>,
}

/// Client for the upstream chat/completions endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl CompletionClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout (used by tests).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Relay a turn and return the raw, shape-validated completion body.
    pub async fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> Result<Value, CompletionError> {
        let mut payload = json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });
        if let Some(tools) = request.tools {
            payload["tools"] = serde_json::to_value(tools)
                .map_err(|_| CompletionError::MalformedResponse("unserializable tool catalog"))?;
        }

        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            tools = request.tools.map_or(0, |tools| tools.len()),
            "relaying chat turn"
        );

        let response = http_client()
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_body(response).await;
            return Err(CompletionError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::Transport(e)
            }
        })?;
        validate_completion(&body)?;
        Ok(body)
    }
}

/// Reject bodies without a usable first choice. Absence is fatal, not retried.
fn validate_completion(body: &Value) -> Result<(), CompletionError> {
    let choices = body
        .get("choices")
        .and_then(Value::as_array)
        .ok_or(CompletionError::MalformedResponse("missing choices"))?;
    let first = choices
        .first()
        .ok_or(CompletionError::MalformedResponse("empty choices"))?;
    if !first.get("message").is_some_and(Value::is_object) {
        return Err(CompletionError::MalformedResponse(
            "first choice has no message",
        ));
    }
    Ok(())
}

async fn read_capped_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while end > 0 && !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...(truncated)");
    }
    body
}
