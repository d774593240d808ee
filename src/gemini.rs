use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ChatError;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Wrap the user's message so the model answers in the Markdown subset the
/// renderer understands.
pub fn build_prompt(message: &str) -> String {
    format!(
        "Please provide your response using standard Markdown for formatting \
         (e.g., **bold**, *italics*, `code`, lists with - or *, and code blocks with ```). \
         Do not use HTML tags in your response. User's message: \"{message}\""
    )
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.gemini_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.gemini_api_base, config.gemini_model
            ),
            api_key: config.gemini_api_key.clone(),
            timeout_ms: config.gemini_timeout_ms,
        })
    }

    pub async fn generate(&self, message: &str) -> Result<String, ChatError> {
        let prompt = build_prompt(message);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorResponse>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ChatError::Provider(format!("{status}: {detail}")));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        reply_text(parsed)
    }

    fn request_error(&self, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(self.timeout_ms.div_ceil(1000))
        } else {
            ChatError::Http(err)
        }
    }
}

fn reply_text(response: GenerateResponse) -> Result<String, ChatError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(ChatError::EmptyReply)
    } else {
        Ok(text)
    }
}
