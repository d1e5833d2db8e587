//! Keyword-based criteria extraction from raw user input.
//!
//! Detection is a substring test on the lowercased input, and the
//! value is whatever follows the last occurrence of the split keyword
//! in the input as typed.  The location check fires on the
//! bare substring "in" (so "industry", "find", ... all trigger it) and
//! splits on "location", falling back to the whole input.

use crate::state::{DialogueState, is_set};

struct Rule {
    /// Any of these in the lowercased input triggers the rule.
    triggers: &'static [&'static str],
    /// The value is taken after the last occurrence of this keyword.
    split_on: &'static str,
}

const INDUSTRY: Rule = Rule {
    triggers: &["industry"],
    split_on: "industry",
};
const CONTRACT_TYPE: Rule = Rule {
    triggers: &["contract type"],
    split_on: "contract type",
};
const LOCATION: Rule = Rule {
    triggers: &["in", "location"],
    split_on: "location",
};
const BUDGET: Rule = Rule {
    triggers: &["budget"],
    split_on: "budget",
};

impl Rule {
    fn apply(&self, field: &mut Option<String>, input: &str, lowered: &str) {
        if is_set(field) || !self.triggers.iter().any(|t| lowered.contains(t)) {
            return;
        }
        let value = after_last(input, self.split_on);
        // An empty value leaves the field open for a later turn.
        *field = (!value.is_empty()).then(|| value.to_string());
    }
}

/// Text after the last `keyword` in `input`, or all of `input` when the
/// keyword is absent (case-sensitive), trimmed.
fn after_last<'a>(input: &'a str, keyword: &str) -> &'a str {
    match input.rfind(keyword) {
        Some(pos) => input[pos + keyword.len()..].trim(),
        None => input.trim(),
    }
}

/// Fill in any still-unknown criteria from one line of user input.  Known
/// criteria are never overwritten.
pub fn extract_fields(state: &mut DialogueState, input: &str) {
    let lowered = input.to_lowercase();
    INDUSTRY.apply(&mut state.industry, input, &lowered);
    CONTRACT_TYPE.apply(&mut state.contract_type, input, &lowered);
    LOCATION.apply(&mut state.location, input, &lowered);
    BUDGET.apply(&mut state.budget_range, input, &lowered);
}
