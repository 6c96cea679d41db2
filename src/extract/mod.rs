pub mod bio;
pub mod fields;

use std::time::Duration;

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

use crate::page::Page;
use crate::text::{clean_bio, element_text, text_lines};

/// Settle delay after a simulated expansion click, letting asynchronous
/// content growth finish before the document is re-read.
pub const SETTLE_MS: u64 = 500;

// Case-sensitive, matching the affordance text as rendered.
const EXPAND_PHRASES: &[&str] = &["Show more", "see more"];

/// The extracted field set. `name` and `company` are required for a valid
/// result; `title` and `biography` are best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prospect {
    pub name: String,
    pub title: String,
    pub company: String,
    pub biography: String,
}

impl Prospect {
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.company.is_empty()
    }
}

/// Run the whole pipeline against a page: expand collapsed sections, resolve
/// the three scalar fields, extract and clean the biography, assemble.
///
/// Every internal miss degrades to an empty field; the only failure surface
/// is the caller-side validity gate on the returned record. Re-running
/// against an unchanged page yields an identical record.
pub async fn extract_prospect(page: &mut dyn Page) -> Prospect {
    expand_hidden_sections(page).await;

    let doc = Html::parse_document(&page.html());
    let flat_text = page.visible_text();
    let lines = text_lines(&flat_text);

    let name = fields::resolve_name(&doc);
    let title = fields::resolve_title(&doc, name.as_deref());
    let company = fields::resolve_company(&doc, &flat_text);
    let biography = bio::resolve_bio(&doc, &lines)
        .map(|b| clean_bio(&b))
        .unwrap_or_default();

    Prospect {
        name: name.unwrap_or_default(),
        title: title.unwrap_or_default(),
        company: company.unwrap_or_default(),
        biography,
    }
}

/// Best-effort enrichment: click the first "show more"-like affordance and
/// wait for the settle delay. Missing affordances are ignored. This is the
/// pipeline's single suspension point.
async fn expand_hidden_sections(page: &mut dyn Page) {
    let phrase = {
        let doc = Html::parse_document(&page.html());
        let Ok(sel) = Selector::parse("button, a") else {
            return;
        };
        doc.select(&sel).find_map(|el| {
            let text = element_text(&el);
            EXPAND_PHRASES.iter().find(|p| text.contains(**p)).copied()
        })
    };

    if let Some(phrase) = phrase {
        debug!(phrase, "expanding collapsed section");
        if page.click_text(phrase) {
            tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;
        }
    }
}
