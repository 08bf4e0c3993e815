use log::error;
use once_cell::sync::Lazy;
use reqwest::{ Client as HttpClient, Response, StatusCode };
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::chat::{ ChatResponse, ConversationMessage, HealthStatus };

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const BASE_URL_ENV: &str = "API_BASE_URL";
const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/health";

static CONFIGURED_BASE_URL: Lazy<String> = Lazy::new(||
    resolve_base_url(std::env::var(BASE_URL_ENV).ok())
);

/// Falls back to [`DEFAULT_BASE_URL`] when the value is missing or blank.
pub fn resolve_base_url(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Base URL taken from `API_BASE_URL`, read on first use and kept for the
/// lifetime of the process.
pub fn configured_base_url() -> &'static str {
    &CONFIGURED_BASE_URL
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or no response arrived.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend {
        status: StatusCode,
        message: String,
    },

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }
}

#[derive(Serialize)]
struct OutgoingChat<'a> {
    message: &'a str,
    conversation_history: &'a [ConversationMessage],
}

/// Stateless client for the chat backend. Every call is a single request;
/// there is no retry and no timeout beyond what the supplied
/// `reqwest::Client` was built with.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: HttpClient,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, HttpClient::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: HttpClient) -> Self {
        let base: String = base_url.into();
        Self {
            http,
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(configured_base_url())
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    pub async fn send_chat_message(
        &self,
        message: &str,
        conversation_history: &[ConversationMessage]
    ) -> Result<ChatResponse, ClientError> {
        let url = self.chat_url();
        let body = OutgoingChat { message, conversation_history };

        let resp = self.http.post(&url).json(&body).send().await?;
        decode_json(ensure_success(resp, &url).await?).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.health_url();
        let resp = self.http.get(&url).send().await?;
        decode_json(ensure_success(resp, &url).await?).await
    }
}

async fn ensure_success(resp: Response, url: &str) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    error!("Chat backend error from {}: status={} body={}", url, status.as_u16(), body);

    let message = if body.is_empty() { status_message(status) } else { body };
    Err(ClientError::Backend { status, message })
}

fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Request failed with status {} {}", status.as_u16(), reason),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
