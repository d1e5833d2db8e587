use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Conversation history plus the four search criteria gathered so far.
///
/// Lives for one process run.  Messages are only ever appended; a criterion
/// is filled in once and never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub messages: Vec<Message>,
    pub industry: Option<String>,
    pub contract_type: Option<String>,
    pub location: Option<String>,
    pub budget_range: Option<String>,
}

/// A criterion counts as known only when it holds a non-empty value.
pub(crate) fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Industry, contract type and location are all known.  Budget never
    /// blocks a search.
    pub fn has_required_fields(&self) -> bool {
        is_set(&self.industry) && is_set(&self.contract_type) && is_set(&self.location)
    }
}
