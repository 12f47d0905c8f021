use serde::{Deserialize, Serialize};

/// Source label used when an input cannot name its own origin.
pub const DEFAULT_SOURCE: &str = "google";

/// One merged job listing in the canonical column order. Field renames
/// carry the exact header casing of the merged output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Posted Time")]
    pub posted_time: String,
    #[serde(rename = "Job Link")]
    pub job_link: String,
    #[serde(rename = "Collected At")]
    pub collected_at: String,
}

impl JobRecord {
    /// Build a record from raw cell values, trimming surrounding whitespace.
    /// Never fails; callers pass empty strings for absent cells.
    pub fn normalize(
        source: &str,
        title: &str,
        company: &str,
        location: &str,
        posted_time: &str,
        job_link: &str,
        collected_at: &str,
    ) -> Self {
        JobRecord {
            source: source.trim().to_string(),
            title: title.trim().to_string(),
            company: company.trim().to_string(),
            location: location.trim().to_string(),
            posted_time: posted_time.trim().to_string(),
            job_link: job_link.trim().to_string(),
            collected_at: collected_at.trim().to_string(),
        }
    }

    /// Key two listings are considered duplicates under: title + company +
    /// location, case-insensitive. Posted time and link are excluded, so a
    /// re-posted listing collapses onto its first appearance.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.title.to_lowercase(),
            self.company.to_lowercase(),
            self.location.to_lowercase()
        )
    }
}
