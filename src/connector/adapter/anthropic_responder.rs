use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::Responder;
use crate::domain::{PersonaConfig, ResponderError};

use super::provider_error::{classify_status, classify_transport};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;
const PROVIDER: &str = "Anthropic";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// [`Responder`] for the Anthropic Messages API and compatible endpoints such
/// as LM Studio.
///
/// The persona's `model_id` selects the model, so a persona targeting Claude
/// should set e.g. `model_id = "claude-haiku-4-5"`.
///
/// ```text
/// ANTHROPIC_BASE_URL=http://localhost:1234
/// ANTHROPIC_API_KEY=sk-ant-...
/// ```
///
/// When the target is a local server, each request is preceded by a `HEAD /`
/// request with a 2-second timeout, so a server that is not running fails fast
/// instead of waiting for the full request timeout.
pub struct AnthropicResponder {
    client: reqwest::Client,
    /// Connectivity check only; the response body is discarded.
    reachability_client: reqwest::Client,
    api_key: Option<String>,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
    /// Reachability check target, e.g. `http://localhost:1234/`.
    base_url: String,
}

impl AnthropicResponder {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base: String = base_url.into();
        let trimmed = base.trim_end_matches('/');
        let url = format!("{trimmed}{MESSAGES_PATH}");
        let base_url = format!("{trimmed}/");
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            reachability_client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(2))
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url,
            base_url,
        }
    }

    /// Build with the base URL from `ANTHROPIC_BASE_URL`, defaulting to the Anthropic cloud.
    pub fn with_key(api_key: Option<String>, timeout: Duration) -> Self {
        let base = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base, timeout)
    }

    fn is_local(&self) -> bool {
        self.base_url.contains("://localhost") || self.base_url.contains("://127.0.0.1")
    }

    async fn check_reachable(&self) -> Result<(), ResponderError> {
        if !self.is_local() {
            return Ok(());
        }

        // Any HTTP response, even 4xx/5xx, means the server is up.
        match self.reachability_client.head(&self.base_url).send().await {
            Err(e) if e.is_connect() || e.is_timeout() => Err(ResponderError::unavailable(
                format!(
                    "{PROVIDER}: server not reachable at {}: {e}",
                    self.base_url.trim_end_matches('/')
                ),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Responder for AnthropicResponder {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        question: &str,
    ) -> Result<String, ResponderError> {
        // Local compatible servers run without a key.
        if self.api_key.is_none() && !self.is_local() {
            return Err(ResponderError::unauthenticated(format!(
                "{API_KEY_VAR} is not configured"
            )));
        }
        if question.trim().is_empty() {
            return Err(ResponderError::invalid_request("question is empty"));
        }
        if persona.model_id().is_empty() {
            return Err(ResponderError::invalid_request("persona has no model id"));
        }

        self.check_reachable().await?;

        let system_prompt = persona.system_prompt();
        let request = ApiRequest {
            model: persona.model_id(),
            max_tokens: MAX_TOKENS,
            system: &system_prompt,
            messages: vec![ApiMessage {
                role: "user",
                content: question,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", self.api_key.as_deref().unwrap_or_default())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(PROVIDER, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicResponder: API returned {status}: {body}");
            return Err(classify_status(PROVIDER, status, &body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            ResponderError::unknown(format!("{PROVIDER}: failed to parse response: {e}"))
        })?;

        let answer: String = api_response
            .content
            .into_iter()
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");

        if answer.trim().is_empty() {
            return Err(ResponderError::unknown(format!(
                "{PROVIDER} returned no answer text"
            )));
        }

        debug!("AnthropicResponder raw answer: {answer}");
        Ok(answer)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
