use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::text::{element_text, element_text_block, strip_about_label};

/// Minimum accepted biography length; shorter matches are treated as chrome.
pub const MIN_BIO_LEN: usize = 50;

// Containers expected to hold the about/bio block, strongest first.
const BIO_CONTAINER_SELECTORS: &[&str] = &[
    "section.profile-summary",
    "div.profile-summary",
    "section[data-test-profile-summary]",
    "div[data-test-profile-summary]",
    ".profile-topcard__summary",
    r#"[data-test-id="about-section"]"#,
    ".pv-about-section",
    ".inline-show-more-text",
    r#"section[data-section="summary"]"#,
    r#"div[class*="about"] div[class*="show-more"]"#,
    "div.artdeco-card section",
];

const HEADING_SELECTOR: &str = r#"h2, h3, div[class*="heading"], div[class*="title"]"#;
const HEADING_WORDS: &[&str] = &["about", "about this profile"];

// Lines that start the next structural section of the page. Lowercase; a
// boundary is an exact match or `word + " "` prefix.
const STOP_WORDS: &[&str] = &[
    "experience",
    "education",
    "licenses",
    "skills",
    "activity",
    "recommendations",
    "recent post",
    "mutual connection",
    "teamlink",
];

// Call-to-action lines dropped inside the bio window without ending it.
const NOISE_PHRASES: &[&str] = &[
    "Message",
    "Connect",
    "Save to",
    "Send InMail",
    "Account has",
    "intent",
    "View profile",
    "See all",
    "Get insights",
    "BETA",
    "Learn more",
    "Enrich or push",
    "Push to",
    "FIND EMAIL",
    "FIND PHONE",
    "Powered by",
    "Not added to",
];

// Phrases that disqualify a lookahead line from counting as bio content.
const NON_BIO_LOOKAHEAD: &[&str] = &["Relationship", "Experience", "Get insights", "Generate Lead"];

const LOOKAHEAD_LINES: usize = 4;
const MIN_LOOKAHEAD_CONTENT: usize = 20;
const MIN_BIO_LINE: usize = 10;
const WINDOW_LINES: usize = 40;

/// Resolve the biography: structural containers first, then an "About"
/// heading in the DOM, then a heuristic scan of the flattened line stream.
/// Returns the raw (uncleaned) region text.
pub fn resolve_bio(doc: &Html, lines: &[String]) -> Option<String> {
    container_bio(doc)
        .or_else(|| heading_sibling_bio(doc))
        .or_else(|| line_stream_bio(lines))
}

fn container_bio(doc: &Html) -> Option<String> {
    for sel_str in BIO_CONTAINER_SELECTORS {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        if let Some(el) = doc.select(&sel).next() {
            let text = strip_about_label(&element_text_block(&el));
            if text.len() > MIN_BIO_LEN {
                debug!(selector = sel_str, len = text.len(), "bio from container");
                return Some(text);
            }
        }
    }
    None
}

/// Find a heading whose exact text is "about" and take its next element
/// sibling (or, if the heading is the last child, its parent's next sibling).
fn heading_sibling_bio(doc: &Html) -> Option<String> {
    let sel = Selector::parse(HEADING_SELECTOR).ok()?;
    for heading in doc.select(&sel) {
        if !element_text(&heading).eq_ignore_ascii_case("about") {
            continue;
        }
        let content = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .or_else(|| {
                heading
                    .parent()?
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .next()
            });
        if let Some(el) = content {
            let text = element_text_block(&el);
            if text.len() > MIN_BIO_LEN
                && !text.contains("Relationship")
                && !text.contains("Experience")
            {
                debug!(len = text.len(), "bio from heading sibling");
                return Some(text);
            }
        }
    }
    None
}

/// Pure line-stream scan: locate a content-bearing "About" heading line,
/// then collect lines until a section boundary, dropping noise lines.
pub fn line_stream_bio(lines: &[String]) -> Option<String> {
    let start = find_bio_heading(lines)?;
    let mut collected: Vec<&str> = Vec::new();

    for line in lines.iter().skip(start + 1).take(WINDOW_LINES) {
        let lower = line.to_lowercase();
        if STOP_WORDS
            .iter()
            .any(|w| lower == *w || lower.starts_with(&format!("{} ", w)))
        {
            debug!(line = %line, "bio window closed at section boundary");
            break;
        }
        if is_noise_line(line, &lower) {
            continue;
        }
        collected.push(line);
    }

    if collected.is_empty() {
        None
    } else {
        debug!(lines = collected.len(), "bio from line stream");
        Some(collected.join("\n"))
    }
}

/// First "About"-labeled line with qualifying lookahead content wins. A page
/// can carry several "About" occurrences (navigation, "About this profile"
/// chrome); only a content-bearing one is accepted. If two genuine bio
/// sections exist, the earlier one in the stream is taken.
fn find_bio_heading(lines: &[String]) -> Option<usize> {
    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if HEADING_WORDS.contains(&lower.as_str()) && has_content_ahead(lines, i) {
            return Some(i);
        }
    }
    None
}

fn has_content_ahead(lines: &[String], idx: usize) -> bool {
    lines.iter().skip(idx + 1).take(LOOKAHEAD_LINES).any(|l| {
        l.len() > MIN_LOOKAHEAD_CONTENT && !NON_BIO_LOOKAHEAD.iter().any(|p| l.contains(p))
    })
}

fn is_noise_line(line: &str, lower: &str) -> bool {
    line.len() < MIN_BIO_LINE
        || lower == "relationship"
        || NOISE_PHRASES.iter().any(|p| line.contains(p))
}
