pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::LlmConfig;
use self::gemini::GeminiChatClient;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("missing configuration: {0}")]
    Config(String),

    #[error("completion request failed: {0}")]
    Http(reqwest::Error),

    #[error("completion provider returned {status}: {body}")]
    Provider {
        status: u16,
        body: String,
    },
}

/// Request URLs can carry credentials, so they never reach the message.
impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        CompletionError::Http(e.without_url())
    }
}

/// Single-shot text completion against a hosted model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    fn model(&self) -> &str;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, CompletionError> {
    let client = GeminiChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
