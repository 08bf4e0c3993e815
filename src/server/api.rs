use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

use crate::models::chat::{ ChatRequest, ChatResponse, HealthStatus, Source };
use crate::rag::RagService;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Please enter your question")]
    EmptyQuery,

    #[error("Error while processing the request")]
    Processing,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::EmptyQuery => StatusCode::BAD_REQUEST,
            ApiError::Processing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// `rag` is `None` when the completion backend could not be set up; chat
/// requests then answer 503 while `/health` keeps working.
#[derive(Clone)]
pub struct AppState {
    pub rag: Option<Arc<RagService>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        rag_service_ready: state.rag.is_some(),
    })
}

fn describe_request(req: &ChatRequest) -> String {
    format!(
        "{} chars, {} history turns",
        req.message.chars().count(),
        req.conversation_history.len()
    )
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let rag = state.rag.as_ref().ok_or(ApiError::ServiceUnavailable)?;

    if req.message.trim().is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    info!("Chat request: {}", describe_request(&req));

    let raw = rag
        .generate_response(&req.message, &req.conversation_history).await
        .map_err(|e| {
            error!("Error in /api/chat: {}", e);
            ApiError::Processing
        })?;

    let sources = raw.source_documents
        .into_iter()
        .enumerate()
        .map(|(i, doc)| Source {
            id: i as i64,
            content: doc.content,
            section: doc.section,
        })
        .collect();

    Ok(Json(ChatResponse {
        answer: raw.answer,
        sources,
        metadata: raw.metadata,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ConversationMessage;

    #[test]
    fn request_summary_counts_characters() {
        let req = ChatRequest {
            message: "გამარჯობა".to_string(),
            conversation_history: vec![ConversationMessage::user("hi")],
        };
        assert_eq!(describe_request(&req), "9 chars, 1 history turns");
    }
}
