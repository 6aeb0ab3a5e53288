// src/llm/mod.rs
// Provider seam for the generative model, so the orchestrator can be driven
// by a scripted fake in tests.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// One entry of model input. Gemini-style roles: "user" or "model".
#[derive(Debug, Clone)]
pub struct Content {
    pub role: &'static str,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Single non-streaming completion. `model` names the concrete model id
    /// so callers can retry the same request against a fallback identifier.
    /// Ok(None) means the model answered but produced no usable text; that
    /// is not a failure and does not warrant a retry.
    async fn generate(
        &self,
        model: &str,
        system: &str,
        contents: &[Content],
    ) -> Result<Option<String>, LlmError>;
}
