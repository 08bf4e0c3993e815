use crate::models::chat::{ ConversationMessage, Role };

/// Caller-side transcript. The chat client itself keeps no state, so
/// whoever drives a multi-turn exchange records the turns here and hands
/// `messages()` to every request.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Records a completed exchange, question first.
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.messages.push(ConversationMessage::user(question));
        self.messages.push(ConversationMessage::assistant(answer));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Renders a history as `User:` / `Assistant:` lines; `—` stands in for an
/// empty history.
pub fn format_history_for_prompt(history: &[ConversationMessage]) -> String {
    if history.is_empty() {
        return "—".to_string();
    }

    history
        .iter()
        .map(|msg| {
            let role_display = match msg.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", role_display, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
