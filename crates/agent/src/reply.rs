use anyhow::Result;
use async_trait::async_trait;

use contract_finder_llm::{CONTRACT_FINDER_SYSTEM_PROMPT, ChatMessage, GroqClient};

use crate::state::{DialogueState, Role};

/// Produces a free-form assistant reply for the current dialogue.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate_reply(&self, state: &DialogueState) -> Result<String>;
}

/// Summarise the known criteria for the model.
fn criteria_note(state: &DialogueState) -> String {
    let show = |field: &Option<String>| field.clone().unwrap_or_else(|| "unknown".to_string());
    format!(
        "Known search criteria: industry={}, contract type={}, location={}, budget range={}",
        show(&state.industry),
        show(&state.contract_type),
        show(&state.location),
        show(&state.budget_range),
    )
}

/// System prompt, criteria note, then the dialogue in order.
pub fn to_chat_messages(state: &DialogueState) -> Vec<ChatMessage> {
    let mut messages = vec![
        ChatMessage::system(CONTRACT_FINDER_SYSTEM_PROMPT),
        ChatMessage::system(criteria_note(state)),
    ];
    messages.extend(state.messages.iter().map(|m| match m.role {
        Role::User => ChatMessage::user(m.content.clone()),
        Role::Assistant => ChatMessage::assistant(m.content.clone()),
    }));
    messages
}

#[async_trait]
impl ReplyGenerator for GroqClient {
    async fn generate_reply(&self, state: &DialogueState) -> Result<String> {
        self.chat(&to_chat_messages(state)).await
    }
}
