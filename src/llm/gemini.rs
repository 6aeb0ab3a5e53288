//! Gemini generateContent provider.
//!
//! Non-streaming subset of the API, enough for one assistant turn per call.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{Content, GenerativeModel, LlmError};
use crate::config::CONFIG;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self { client: HttpClient::new(), api_key }
    }

    /// Create from process config; the key comes from GEMINI_API_KEY.
    pub fn from_config() -> Result<Self> {
        if CONFIG.gemini_api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY not set");
        }
        Ok(Self::new(CONFIG.gemini_api_key.clone()))
    }

    fn build_contents(contents: &[Content]) -> Vec<GeminiContent> {
        contents
            .iter()
            .map(|entry| GeminiContent {
                role: entry.role.to_string(),
                parts: vec![GeminiTextPart { text: entry.text.clone() }],
            })
            .collect()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        system: &str,
        contents: &[Content],
    ) -> Result<Option<String>, LlmError> {
        let api_request = GeminiRequest {
            contents: Self::build_contents(contents),
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiTextPart { text: system.to_string() }],
            }),
        };

        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&api_request)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let api_response: GenerateContentResponse = response.json().await?;

        if let Some(error) = &api_response.error {
            return Err(LlmError::Api {
                status: error.code.unwrap_or_default(),
                body: error.message.clone(),
            });
        }

        Ok(reply_text(&api_response))
    }
}

// ============================================================================
// Reply normalization
// ============================================================================

/// One way of getting reply text out of a response shape. Accessors are tried
/// in order; a new API version means a new entry here, not changes at the
/// call sites.
type ReplyAccessor = fn(&GenerateContentResponse) -> Option<String>;

const REPLY_ACCESSORS: &[ReplyAccessor] = &[top_level_text, first_candidate_text];

pub(crate) fn reply_text(response: &GenerateContentResponse) -> Option<String> {
    REPLY_ACCESSORS
        .iter()
        .find_map(|accessor| accessor(response))
        .filter(|text| !text.is_empty())
}

fn top_level_text(response: &GenerateContentResponse) -> Option<String> {
    response.text.clone().filter(|text| !text.is_empty())
}

fn first_candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.as_ref()?.first()?;
    let parts = &candidate.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|part| part.text.as_deref()).collect();
    if text.is_empty() { None } else { Some(text) }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Deserialize)]
pub(crate) struct GenerateContentResponse {
    text: Option<String>,
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}
