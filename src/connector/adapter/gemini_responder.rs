use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::Responder;
use crate::domain::{PersonaConfig, ResponderError};

use super::provider_error::{classify_status, classify_transport};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
const PROVIDER: &str = "Gemini";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: ApiContent<'a>,
    contents: Vec<ApiContent<'a>>,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// [`Responder`] backed by the Google Generative Language API
/// (`models/{model}:generateContent`).
///
/// The persona's system prompt goes into `systemInstruction`; the question is
/// sent as the only user turn. Without an API key every call fails with
/// `Unauthenticated` before touching the network.
///
/// ```text
/// GOOGLE_API_KEY=...                      # via .env or the secrets file
/// GEMINI_BASE_URL=http://localhost:9000   # optional, for proxies and tests
/// ```
pub struct GeminiResponder {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiResponder {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Build with the base URL from `GEMINI_BASE_URL`, defaulting to Google's endpoint.
    pub fn with_key(api_key: Option<String>, timeout: Duration) -> Self {
        let base = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base, timeout)
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model_id)
    }

    fn extract_answer(response: ApiResponse) -> Result<String, ResponderError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ResponderError::invalid_request(format!(
                "{PROVIDER} blocked the prompt: {reason}"
            )));
        }

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ResponderError::unknown(format!(
                "{PROVIDER} returned no answer text"
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        question: &str,
    ) -> Result<String, ResponderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ResponderError::unauthenticated(format!("{API_KEY_VAR} is not configured"))
        })?;

        if question.trim().is_empty() {
            return Err(ResponderError::invalid_request("question is empty"));
        }
        if persona.model_id().is_empty() {
            return Err(ResponderError::invalid_request("persona has no model id"));
        }

        let system_prompt = persona.system_prompt();
        let request = ApiRequest {
            system_instruction: ApiContent {
                role: None,
                parts: vec![ApiPart {
                    text: &system_prompt,
                }],
            },
            contents: vec![ApiContent {
                role: Some("user"),
                parts: vec![ApiPart { text: question }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(persona.model_id()))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(PROVIDER, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiResponder: API returned {status}: {body}");
            return Err(classify_status(PROVIDER, status, &body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            ResponderError::unknown(format!("{PROVIDER}: failed to parse response: {e}"))
        })?;

        let answer = Self::extract_answer(api_response)?;
        debug!("GeminiResponder raw answer: {answer}");
        Ok(answer)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
