//! Query construction, result normalisation and rendering for the search step.

use tracing::{debug, warn};

use contract_finder_tools::{RawSearchResult, SearchProvider};

use crate::state::{DialogueState, Message};

pub const NO_RESULTS_MESSAGE: &str = "I'm sorry, but I couldn't find any contract opportunities \
matching your criteria. Would you like to modify your search parameters?";

const RESULTS_HEADER: &str = "I've found some contract opportunities matching your criteria:";

const DEFAULT_TITLE: &str = "Untitled Contract Opportunity";
const DEFAULT_URL: &str = "No URL available";
const DEFAULT_CONTENT: &str = "No description available";

/// Characters of each snippet shown in the reply.
const SNIPPET_CHARS: usize = 200;

/// A search hit with every field filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultRecord {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl SearchResultRecord {
    pub fn from_raw(raw: RawSearchResult) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            url: raw.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            content: raw.content.unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
        }
    }

    /// First 200 characters plus `...`, appended even to short snippets.
    pub fn snippet(&self) -> String {
        let head: String = self.content.chars().take(SNIPPET_CHARS).collect();
        format!("{head}...")
    }
}

fn or_default<'a>(field: &'a Option<String>, default: &'a str) -> &'a str {
    field.as_deref().filter(|value| !value.is_empty()).unwrap_or(default)
}

pub fn build_query(state: &DialogueState) -> String {
    format!(
        "Latest {} contract opportunities in {} industry located in {} with budget range {}",
        or_default(&state.contract_type, ""),
        or_default(&state.industry, ""),
        or_default(&state.location, ""),
        or_default(&state.budget_range, "any"),
    )
}

pub fn render_results(records: &[SearchResultRecord]) -> String {
    if records.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let entries = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "{}. {}\n   URL: {}\n   Description: {}",
                i + 1,
                record.title,
                record.url,
                record.snippet()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{RESULTS_HEADER}\n\n{entries}")
}

/// The search step's assistant message, plus the provider error when the
/// search failed and the message fell back to the apology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub message: Message,
    pub failure: Option<String>,
}

/// Run one search and render it as an assistant message.
///
/// A failing provider reads as "no results"; it never fails the turn.  The
/// error text is handed back in [`SearchOutcome::failure`] for the caller to
/// report.
pub async fn search_contracts(
    provider: &dyn SearchProvider,
    state: &DialogueState,
    max_results: usize,
) -> SearchOutcome {
    let query = build_query(state);
    debug!(%query, "searching for contracts");

    let (raw, failure) = match provider.search(&query, max_results).await {
        Ok(raw) => (raw, None),
        Err(err) => {
            warn!(error = %err, "Error in contract search");
            (Vec::new(), Some(format!("{err:#}")))
        }
    };

    let records = raw
        .into_iter()
        .take(max_results)
        .map(SearchResultRecord::from_raw)
        .collect::<Vec<_>>();
    SearchOutcome {
        message: Message::assistant(render_results(&records)),
        failure,
    }
}
