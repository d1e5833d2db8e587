//! Single-page scraper: fetch a URL, keep the visible text, write it to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use scraper::{Html, Node};
use tracing::{info, warn};

/// Elements whose text content never reaches the reader.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Saved { path: PathBuf, bytes: usize },
    Failed { status: StatusCode },
}

/// Concatenate every text node of `html` in document order.
///
/// Whitespace is kept exactly as it appears in the markup.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

/// Persist a fetched page.  Only an exact `200 OK` writes the file; the
/// output is overwritten, never appended to.
pub fn save_response(status: StatusCode, body: &str, path: &Path) -> Result<ScrapeOutcome> {
    if status != StatusCode::OK {
        warn!(%status, "page fetch did not return 200; nothing written");
        return Ok(ScrapeOutcome::Failed { status });
    }

    let text = extract_visible_text(body);
    fs::write(path, &text).with_context(|| format!("write scraped text to {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "scraped text saved");
    Ok(ScrapeOutcome::Saved {
        path: path.to_path_buf(),
        bytes: text.len(),
    })
}

/// Fetch `url` once (no retries) and hand the response to [`save_response`].
pub async fn scrape_to_file(url: &str, path: &Path) -> Result<ScrapeOutcome> {
    info!(%url, "fetching page");
    let resp = reqwest::get(url).await?;
    let status = resp.status();
    let body = resp.text().await?;
    save_response(status, &body, path)
}
