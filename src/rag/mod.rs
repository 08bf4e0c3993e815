use log::{ info, warn };
use serde::{ Deserialize, Serialize };
use serde_json::{ json, Map, Value };
use std::sync::Arc;

use crate::history::format_history_for_prompt;
use crate::llm::chat::{ CompletionClient, CompletionError };
use crate::models::chat::ConversationMessage;

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful AI assistant for the Subconscious app. \
     Answer clearly, in a structured way, and as usefully as possible. \
     If the question is unclear, ask the user to clarify.";

const ANSWER_REQUEST: &str = "Please give a detailed and easy to follow answer";

pub const DEFAULT_ANSWER_LANGUAGE: &str = "Georgian";

pub const FALLBACK_ANSWER: &str =
    "I could not process this question, please try rephrasing it.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub content: String,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
    pub source_documents: Vec<SourceDocument>,
    pub metadata: Map<String, Value>,
}

#[derive(Clone)]
pub struct RagService {
    chat_client: Arc<dyn CompletionClient>,
    answer_language: Option<String>,
}

impl RagService {
    pub fn new(chat_client: Arc<dyn CompletionClient>) -> Self {
        Self {
            chat_client,
            answer_language: Some(DEFAULT_ANSWER_LANGUAGE.to_string()),
        }
    }

    /// `None` or a blank value leaves the reply language to the model.
    pub fn with_answer_language(mut self, language: Option<String>) -> Self {
        self.answer_language = language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    pub fn model(&self) -> &str {
        self.chat_client.model()
    }

    pub fn build_prompt(&self, query: &str, history: &[ConversationMessage]) -> String {
        let answer_request = match &self.answer_language {
            Some(language) => format!("{} in {}.", ANSWER_REQUEST, language),
            None => format!("{}.", ANSWER_REQUEST),
        };
        format!(
            "{}\n\nConversation history:\n{}\n\nThe user's new question:\nUser: {}\n\n{}",
            SYSTEM_INSTRUCTION,
            format_history_for_prompt(history),
            query,
            answer_request
        )
    }

    pub async fn generate_response(
        &self,
        query: &str,
        history: &[ConversationMessage]
    ) -> Result<RagAnswer, CompletionError> {
        let prompt = self.build_prompt(query, history);
        info!("Generating answer with {} ({} history turns)", self.model(), history.len());

        let text = self.chat_client.complete(&prompt).await?;
        let answer = if text.trim().is_empty() {
            warn!("Model returned an empty answer, using fallback text");
            FALLBACK_ANSWER.to_string()
        } else {
            text
        };

        let source_documents = vec![SourceDocument {
            content: "The answer was generated by the language model from the conversation history and the question.".to_string(),
            section: format!("model: {}", self.model()),
        }];

        let mut metadata = Map::new();
        metadata.insert("model".to_string(), json!(self.model()));
        metadata.insert("has_history".to_string(), json!(!history.is_empty()));

        Ok(RagAnswer { answer, source_documents, metadata })
    }
}
