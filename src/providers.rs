//! HTTP clients for the supported completion APIs.
//!
//! | Provider | Endpoint | Auth |
//! |----------|----------|------|
//! | Gemini | `POST {base}/v1beta/models/{model}:generateContent` | `x-goog-api-key` header |
//! | OpenAI-compatible | `POST {base}/chat/completions` | bearer token |
//!
//! Both implement [`AskAsync`] with a plain `String` response, so the
//! summarizer does not care which one it talks to.

use crate::api::AskAsync;
use crate::config::{PipelineConfig, Provider};
use crate::error::{ConfigError, LlmError};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// The configured completion client.
#[derive(Debug)]
pub enum LlmClient {
    Gemini(GeminiClient),
    OpenAi(OpenAiClient),
}

impl LlmClient {
    /// Build the client selected by `config.provider`.
    ///
    /// Fails when the API key is missing or, for Gemini, malformed.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::ApiKey("no API key configured".into()))?;
        let timeout = config.llm_timeout();

        let client = match config.provider {
            Provider::Gemini => LlmClient::Gemini(GeminiClient::new(
                config.api_base_url(),
                key,
                &config.model_name,
                timeout,
            )?),
            Provider::OpenAi => LlmClient::OpenAi(OpenAiClient::new(
                config.api_base_url(),
                key,
                &config.model_name,
                timeout,
            )?),
        };
        Ok(client)
    }

    pub fn model(&self) -> &str {
        match self {
            LlmClient::Gemini(c) => &c.model,
            LlmClient::OpenAi(c) => &c.model,
        }
    }
}

impl AskAsync for LlmClient {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<String, LlmError> {
        match self {
            LlmClient::Gemini(c) => c.ask(text).await,
            LlmClient::OpenAi(c) => c.ask(text).await,
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {e}")))
}

/// Send a JSON body and decode a JSON reply, mapping failures to [`LlmError`].
async fn post_json<B, R>(request: reqwest::RequestBuilder, body: &B) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: for<'de> Deserialize<'de>,
{
    let t0 = Instant::now();
    let response = request.json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    if !status.is_success() {
        warn!(status = status.as_u16(), elapsed_ms, "Model API returned an error");
        return Err(LlmError::Status {
            status: status.as_u16(),
            body: crate::utils::truncate_for_log(&text, 500),
        });
    }
    debug!(elapsed_ms, bytes = text.len(), "Model API call succeeded");
    Ok(serde_json::from_str(&text)?)
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Gemini keys always start with `AIza`; anything else is rejected up front.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if !api_key.starts_with("AIza") {
            return Err(ConfigError::ApiKey(
                "Gemini API keys start with \"AIza\"".into(),
            ));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: build_http_client(timeout)?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl AskAsync for GeminiClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<String, LlmError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(text.to_string()),
                }],
            }],
        };
        let request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key);

        let resp: GeminiResponse = post_json(request, &body).await?;
        let content = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(LlmError::EmptyResponse)?;

        let out = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<String>();
        Ok(out)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

// ---------------------------------------------------------------------------
// OpenAI-compatible
// ---------------------------------------------------------------------------

/// Client for any OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: build_http_client(timeout)?,
        })
    }
}

impl AskAsync for OpenAiClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
        };
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);

        let resp: ChatResponse = post_json(request, &body).await?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
