//! The two-step conversation flow: gather details, then search.
//!
//! ```text
//!            ┌──────────── route() == Gathering ───────────┐
//!            ▼                                              │
//!   start ─► Gathering ──► route() ───────────────────────┘
//!                              │
//!                              └── route() == Searching ──► Searching ─► end
//! ```

use crate::state::{DialogueState, Message};

/// Asked whenever industry, contract type or location is unknown.  Always
/// lists all four questions, whatever is already known.
pub const CLARIFICATION_PROMPT: &str = "I'll help you find contract opportunities. \
Could you please provide more details:\n\
1. What industry are you looking for contracts in? (e.g., IT, Construction, Marketing)\n\
2. What type of contract are you seeking? (e.g., Full-time, Part-time, Project-based)\n\
3. In which location are you looking for contracts?\n\
4. Do you have a specific budget range in mind?";

pub const ACKNOWLEDGEMENT: &str =
    "Great! I'll search for contract opportunities based on your details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Gathering,
    Searching,
}

/// Produce the gathering step's single assistant message.  Does not touch
/// the state.
pub fn gather_details(state: &DialogueState) -> Message {
    if state.has_required_fields() {
        Message::assistant(ACKNOWLEDGEMENT)
    } else {
        Message::assistant(CLARIFICATION_PROMPT)
    }
}

/// Pick the step that follows gathering.
///
/// Loops back only when the newest message is the user's and a required
/// field is still missing.  Any other last message (including the
/// assistant's own clarification) proceeds to search.
pub fn route(state: &DialogueState) -> FlowStep {
    match state.last_message() {
        Some(last) if last.is_user() && !state.has_required_fields() => FlowStep::Gathering,
        _ => FlowStep::Searching,
    }
}
