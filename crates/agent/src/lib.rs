//! Conversation flow for the contract finder.
//!
//! One user turn drives a small state machine: the gathering step always
//! runs first, [`route`] then decides whether to gather again or search,
//! and the search step ends the pass.

pub mod extract;
pub mod flow;
pub mod reply;
pub mod search_step;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;
use tracing::debug;

use contract_finder_tools::SearchProvider;

pub use extract::extract_fields;
pub use flow::{ACKNOWLEDGEMENT, CLARIFICATION_PROMPT, FlowStep, gather_details, route};
pub use reply::ReplyGenerator;
pub use search_step::{
    NO_RESULTS_MESSAGE, SearchOutcome, SearchResultRecord, build_query, render_results,
    search_contracts,
};
pub use state::{DialogueState, Message, Role};

/// Upper bound on steps in one pass.
///
/// With the current rules this is never reached: gathering always leaves an
/// assistant message last, so [`route`] picks the search step right after
/// the first gathering step and a pass is exactly two steps.  The bound only
/// matters if a routing rule ever loops back to gathering for good.
const MAX_FLOW_STEPS: usize = 8;

/// Why a pass could not complete.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("conversation flow did not reach the search step within {0} steps")]
    FlowDidNotTerminate(usize),
    #[error("reply generation failed: {0}")]
    ReplyGeneration(anyhow::Error),
}

/// Everything one pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// Assistant messages, in the order the steps produced them.
    pub messages: Vec<Message>,
    /// Provider error from a search that fell back to "no results".
    pub search_failure: Option<String>,
}

/// Owns the collaborators one flow pass needs.
pub struct ContractAgent {
    search: Box<dyn SearchProvider>,
    replies: Option<Box<dyn ReplyGenerator>>,
    max_results: usize,
}

impl ContractAgent {
    pub fn new(search: Box<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            search,
            replies: None,
            max_results,
        }
    }

    /// Ask `replies` for one extra assistant message after every search.
    pub fn with_follow_up_replies(mut self, replies: Box<dyn ReplyGenerator>) -> Self {
        self.replies = Some(replies);
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Run gathering → routing → search once over `state`.  `state` itself
    /// is left untouched; routing sees the pass's own messages on a working
    /// copy.
    pub async fn run_pass(&self, state: &DialogueState) -> Result<PassOutcome, TurnError> {
        let mut working = state.clone();
        let mut produced = Vec::new();
        let mut step = FlowStep::Gathering;

        for _ in 0..MAX_FLOW_STEPS {
            match step {
                FlowStep::Gathering => {
                    let message = gather_details(&working);
                    working.push(message.clone());
                    produced.push(message);
                    step = route(&working);
                    debug!(?step, "routed after gathering");
                }
                FlowStep::Searching => {
                    let SearchOutcome { message, failure } =
                        search_contracts(self.search.as_ref(), &working, self.max_results).await;
                    working.push(message.clone());
                    produced.push(message);

                    if let Some(replies) = &self.replies {
                        let text = replies
                            .generate_reply(&working)
                            .await
                            .map_err(TurnError::ReplyGeneration)?;
                        produced.push(Message::assistant(text));
                    }
                    return Ok(PassOutcome {
                        messages: produced,
                        search_failure: failure,
                    });
                }
            }
        }

        Err(TurnError::FlowDidNotTerminate(MAX_FLOW_STEPS))
    }
}
