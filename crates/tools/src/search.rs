//! Web search capability and the Tavily-backed implementation.

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One hit as returned by a search backend.  Every field is optional: the
/// caller substitutes its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchResult {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

impl RawSearchResult {
    /// Read the three known keys out of an arbitrary JSON object.  A key
    /// holding anything other than a string is treated as absent.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(ToString::to_string);
        Self {
            title: field("title"),
            url: field("url"),
            content: field("content"),
        }
    }
}

/// A hosted search backend: free-text query in, raw hits out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawSearchResult>>;
}

/// Searches through the [Tavily](https://docs.tavily.com) REST API.
pub struct TavilySearch {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilySearch {
    /// `timeout` of `None` keeps reqwest's default (no overall timeout).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("contract-finder/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawSearchResult>> {
        info!(%query, max_results, "tavily search");

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Tavily API error {}: {}", status, body);
        }

        let json: serde_json::Value = resp.json().await?;
        parse_results(&json)
    }
}

/// Decode the `results` array of a Tavily response body.
pub fn parse_results(json: &serde_json::Value) -> Result<Vec<RawSearchResult>> {
    let Some(results) = json.get("results").and_then(|r| r.as_array()) else {
        bail!("malformed search response: missing `results` array");
    };
    Ok(results.iter().map(RawSearchResult::from_json).collect())
}
