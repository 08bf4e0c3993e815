pub mod api;

use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::llm::{ chat::new_client, LlmConfig };
use crate::rag::RagService;
use self::api::{ router, AppState };

pub struct Server {
    addr: String,
    state: AppState,
}

impl Server {
    pub fn new(addr: String, rag: Option<Arc<RagService>>) -> Self {
        Self { addr, state: AppState { rag } }
    }

    /// Builds the server from LLM settings. A completion client that cannot
    /// be constructed leaves the service running without RAG.
    pub fn from_config(addr: String, llm: &LlmConfig, answer_language: Option<String>) -> Self {
        let rag = match new_client(llm) {
            Ok(client) => {
                info!("RagService ready with model {}", client.model());
                Some(Arc::new(RagService::new(client).with_answer_language(answer_language)))
            }
            Err(e) => {
                warn!("RagService init error: {}. Chat requests will answer 503.", e);
                None
            }
        };
        Self::new(addr, rag)
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("HTTP server listening on: http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.state.clone()).into_make_service()).await?;
        Ok(())
    }
}
