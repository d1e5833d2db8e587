//! Test doubles for the search and reply collaborators.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use contract_finder_tools::{RawSearchResult, SearchProvider};

use crate::reply::ReplyGenerator;
use crate::state::DialogueState;

/// Returns canned results and records every `(query, max_results)` call.
pub(crate) struct StubSearch {
    results: Vec<RawSearchResult>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl StubSearch {
    pub(crate) fn new(results: Vec<RawSearchResult>) -> Self {
        Self {
            results,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawSearchResult>> {
        self.calls.lock().unwrap().push((query.to_string(), max_results));
        Ok(self.results.clone())
    }
}

pub(crate) struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<RawSearchResult>> {
        Err(anyhow!("search backend timed out"))
    }
}

/// Fixed reply; remembers how many messages each call saw.
#[derive(Clone)]
pub(crate) struct StubReplies {
    reply: String,
    seen: Arc<Mutex<Vec<usize>>>,
}

impl StubReplies {
    pub(crate) fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn seen_message_counts(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyGenerator for StubReplies {
    async fn generate_reply(&self, state: &DialogueState) -> Result<String> {
        self.seen.lock().unwrap().push(state.messages.len());
        Ok(self.reply.clone())
    }
}

pub(crate) struct FailingReplies;

#[async_trait]
impl ReplyGenerator for FailingReplies {
    async fn generate_reply(&self, _state: &DialogueState) -> Result<String> {
        Err(anyhow!("model unavailable"))
    }
}
