// Scraping side. Each collector drives a shared WebDriver session against
// one job source and returns raw scraped rows; export writing lives in the
// runner so the collectors stay free of file-system concerns.

pub mod boards;
pub mod browser;
pub mod google;
pub mod runner;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thirtyfour::WebDriver;

use crate::error::AppError;

/// One raw scraped listing, before merge-time normalization. Description
/// fields are only populated by the detailed panel collector.
#[derive(Debug, Clone, Default)]
pub struct ScrapedJob {
    pub source: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_time: String,
    pub job_link: String,
    pub description_snippet: String,
    pub description_full: String,
}

/// Search inputs shared by every collector.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub locations: Vec<String>,
    /// Pages to walk per board.
    pub max_pages: usize,
    /// Per-location listing cap; 0 disables it.
    pub max_jobs: usize,
}

/// Trait all job collectors implement. Each one fetches listings from an
/// external source through the provided WebDriver session.
#[async_trait]
pub trait JobCollector: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch listings for the given search parameters.
    async fn collect(
        &self,
        driver: &WebDriver,
        params: &SearchParams,
    ) -> Result<Vec<ScrapedJob>, AppError>;
}

/// Characters left verbatim when encoding query strings.
/// RFC 3986 unreserved: A-Z a-z 0-9 - _ . ~
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query-string component, with spaces as '+'.
pub(crate) fn quote_plus(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plus_encodes_spaces_and_reserved_chars() {
        assert_eq!(quote_plus("php developer"), "php+developer");
        assert_eq!(quote_plus("c++ & rust"), "c%2B%2B+%26+rust");
        assert_eq!(quote_plus("plain-text_1.0~x"), "plain-text_1.0~x");
    }
}
