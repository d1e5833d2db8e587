//! External capabilities used by the contract finder: hosted web search and
//! a one-page text scraper.

pub mod scrape;
pub mod search;

pub use scrape::{ScrapeOutcome, extract_visible_text, save_response, scrape_to_file};
pub use search::{RawSearchResult, SearchProvider, TavilySearch, parse_results};
