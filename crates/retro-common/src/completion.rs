/// Single-prompt client for OpenAI-compatible `/chat/completions` endpoints.
///
/// Grading sends one user message per document and only needs the reply text back, so
/// the wire types are private and the public surface is [`CompletionRequest`] in,
/// [`Completion`] out. Throttling (429), server errors and connection failures are retried
/// with capped exponential backoff; every other failure is returned on the first attempt.
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Upstream error bodies are cut to this many bytes before they reach an error message.
const ERROR_BODY_LIMIT: usize = 8 * 1024;

/// Endpoint and retry settings. The API key is supplied separately by the caller.
#[derive(Clone, Debug)]
pub struct EndpointSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(5_000),
        }
    }
}

impl EndpointSettings {
    /// Optional:
    /// - `OPENAI_BASE_URL` (default: "https://api.openai.com/v1")
    /// - `OPENAI_TIMEOUT_SECS` (default: 60)
    /// - `OPENAI_MAX_RETRIES` (default: 3)
    /// - `OPENAI_RETRY_INITIAL_MS` (default: 200)
    /// - `OPENAI_RETRY_MAX_MS` (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = env_parse::<u64>("OPENAI_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_retries = env_parse::<u32>("OPENAI_MAX_RETRIES").unwrap_or(defaults.max_retries);

        let initial_backoff = env_parse::<u64>("OPENAI_RETRY_INITIAL_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_backoff);

        let max_backoff = env_parse::<u64>("OPENAI_RETRY_MAX_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_backoff);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries,
            initial_backoff,
            max_backoff,
        }
    }

    /// Delay before retry number `retry` (0-based): doubles from `initial_backoff`, capped
    /// at `max_backoff`.
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("completion response had no message content")]
    Empty,
}

impl CompletionError {
    /// Throttling, server-side failures, timeouts and connection errors.
    fn is_transient(&self) -> bool {
        match self {
            CompletionError::Transport(e) => e.is_timeout() || e.is_connect(),
            CompletionError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            CompletionError::Empty => false,
        }
    }
}

/// One grading call: a single user prompt sent to `model`.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
}

/// The reply text and, when the endpoint reports it, token usage.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

#[derive(Clone)]
pub struct CompletionClient {
    settings: EndpointSettings,
    api_key: String,
    http: reqwest::Client,
}

impl CompletionClient {
    pub fn new(
        settings: EndpointSettings,
        api_key: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .user_agent("retro-grading/retro-grader")
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            settings,
            api_key: api_key.into(),
            http,
        })
    }

    pub async fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> Result<Completion, CompletionError> {
        let body = ChatBody::from(request);
        let mut retry: u32 = 0;
        loop {
            match self.send(&body).await {
                Err(e) if retry < self.settings.max_retries && e.is_transient() => {
                    let delay = self.settings.backoff(retry);
                    warn!(
                        model = request.model,
                        retry = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, body: &ChatBody<'_>) -> Result<Completion, CompletionError> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status,
                message: upstream_message(&body),
            });
        }

        let reply: ChatReply = resp.json().await?;
        reply.into_completion()
    }
}

/// `error.message` from an OpenAI-style error body, else the body itself (truncated).
fn upstream_message(body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.message {
            return message;
        }
    }
    let end = body.len().min(ERROR_BODY_LIMIT);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [UserMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<CompletionRequest<'a>> for ChatBody<'a> {
    fn from(request: CompletionRequest<'a>) -> Self {
        Self {
            model: request.model,
            messages: [UserMessage {
                role: "user",
                content: request.prompt,
            }],
            temperature: request.temperature,
        }
    }
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ReplyChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatReply {
    fn into_completion(self) -> Result<Completion, CompletionError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::Empty)?;
        Ok(Completion {
            content,
            usage: self.usage,
        })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Deserialize)]
struct ErrorObject {
    message: Option<String>,
}
