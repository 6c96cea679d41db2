use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct BioSummaryRequest<'a> {
    bio_text: &'a str,
    prospect_name: &'a str,
    prospect_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct BioSummaryResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Client for the note-generator backend's bio summarization endpoint.
///
/// Enrichment is strictly best-effort: transport errors, non-2xx statuses,
/// non-success bodies and empty summaries all collapse to `None`, and the
/// caller keeps the raw biography.
pub struct Summarizer {
    client: reqwest::Client,
    base_url: String,
}

impl Summarizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn summarize(&self, bio: &str, name: &str, title: &str) -> Option<String> {
        let url = format!("{}/api/summarize-bio", self.base_url.trim_end_matches('/'));
        let request = BioSummaryRequest {
            bio_text: bio,
            prospect_name: name,
            prospect_title: title,
        };

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Summarize request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Summarize endpoint returned {}", response.status());
            return None;
        }

        let body: BioSummaryResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Summarize response was not valid JSON: {}", e);
                return None;
            }
        };

        if body.status.as_deref() != Some("success") {
            warn!("Summarize returned non-success status: {:?}", body.status);
            return None;
        }

        let summary = body.summary.filter(|s| !s.trim().is_empty())?;
        debug!(len = summary.len(), "bio summarized");
        Some(summary)
    }
}
