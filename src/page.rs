use anyhow::{Context, Result};
use scraper::Html;
use tracing::info;

use crate::text;

/// Capability surface the extractor needs from the hosting page: a document
/// snapshot, its flattened visible text, and a way to simulate a user click.
///
/// The document is treated as a best-effort snapshot that may change between
/// reads (a live page re-renders asynchronously), so every read goes through
/// `html()` rather than a cached parse.
pub trait Page {
    /// Current HTML source of the page.
    fn html(&self) -> String;

    /// Flattened visible text of the current document.
    fn visible_text(&self) -> String;

    /// Simulate a click on the first interactive element whose text contains
    /// `needle`. Returns whether a click was actually delivered.
    fn click_text(&mut self, needle: &str) -> bool;
}

/// A frozen snapshot of a page, loaded from a file, stdin, or a fetch.
/// Clicks are no-ops: there is no renderer behind the snapshot.
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page file: {}", path))?;
        Ok(Self::new(html))
    }
}

impl Page for StaticPage {
    fn html(&self) -> String {
        self.html.clone()
    }

    fn visible_text(&self) -> String {
        let doc = Html::parse_document(&self.html);
        text::flatten_text(&doc)
    }

    fn click_text(&mut self, _needle: &str) -> bool {
        false
    }
}

/// Fetch a page over HTTP and wrap it as a static snapshot.
pub async fn fetch_page(url: &str) -> Result<StaticPage> {
    info!("Fetching page: {}", url);
    let client = reqwest::Client::new();
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("Failed to fetch page: {}", url))?;
    Ok(StaticPage::new(html))
}
