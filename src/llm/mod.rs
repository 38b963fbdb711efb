//! Advisory removal ranking via the Anthropic Messages API.
//!
//! The reduction core never consults this module: its ranking is logged
//! for the operator after a run misses its target, and nothing here feeds
//! back into the deterministic loop. Transient API failures (rate limits,
//! 5xx) are retried with backoff; anything else surfaces as
//! [`AppError::Llm`] and the caller degrades to the log line.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

pub mod prompts;

use crate::errors::AppError;
use crate::models::{ContentSet, JdBlock};
use crate::store::strip_fences;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Single model for every ranking call; not configurable.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct MessagePart {
    #[serde(rename = "type")]
    part_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|p| p.part_type == "text")
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

enum CallFailure {
    Retryable(String),
    Fatal(AppError),
}

/// Thin Messages-API wrapper carrying the retry policy for ranking calls.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Llm(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { http, api_key })
    }

    /// Sends one prompt and returns the first text part of the reply.
    /// Rate limits and server errors are retried with 1s/2s backoff.
    pub async fn call_text(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let body = json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send(&body).await {
                Ok(text) => return Ok(text),
                Err(CallFailure::Fatal(e)) => return Err(e),
                Err(CallFailure::Retryable(reason)) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(AppError::Llm(format!(
                            "gave up after {attempt} attempts: {reason}"
                        )));
                    }
                    let delay = Duration::from_secs(1 << (attempt - 1));
                    warn!(attempt, %reason, "ranking call failed, backing off");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// `call_text` plus fence stripping and JSON decoding of the reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, AppError> {
        let text = self.call_text(system, prompt).await?;
        serde_json::from_str(strip_fences(&text)).map_err(AppError::Json)
    }

    async fn send(&self, body: &serde_json::Value) -> Result<String, CallFailure> {
        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| CallFailure::Retryable(format!("request failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallFailure::Retryable(format!("API returned {status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CallFailure::Fatal(AppError::Llm(format!(
                "API returned {status}: {message}"
            ))));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CallFailure::Fatal(AppError::Llm(format!("malformed reply: {e}"))))?;
        debug!("ranking call succeeded");
        parsed
            .text()
            .map(|t| t.to_string())
            .ok_or_else(|| CallFailure::Fatal(AppError::Llm("reply had no text part".to_string())))
    }
}

/// One advisory removal suggestion, least valuable first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalSuggestion {
    pub kind: String,
    pub item: String,
    pub rationale: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    suggestions: Vec<RemovalSuggestion>,
}

/// Asks the model which content it would cut first against this JD.
pub async fn suggest_removals(
    client: &LlmClient,
    content: &ContentSet,
    jd: &JdBlock,
) -> Result<Vec<RemovalSuggestion>, AppError> {
    let prompt = prompts::build_removal_prompt(content, jd)?;
    let response: SuggestionResponse = client
        .call_json(prompts::REMOVAL_RANKING_SYSTEM, &prompt)
        .await?;
    Ok(response.suggestions)
}
