use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::text::element_text;

static COMPANY_AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\bat\s+([A-Z][A-Za-z &,.'\-]+?)(?:\s*\||\s*$)").unwrap());

/// One prioritized extraction rule: a structural query tried against the
/// document, paired (by field) with a validation predicate. Order in the
/// strategy lists is part of the contract — earlier entries are stronger
/// signal, not merely first-found.
pub struct FieldStrategy {
    pub id: &'static str,
    pub selector: &'static str,
}

const NAME_STRATEGIES: &[FieldStrategy] = &[
    FieldStrategy { id: "topcard-name", selector: ".profile-topcard__name" },
    FieldStrategy { id: "topcard-entity-name", selector: ".profile-topcard-person-entity__name" },
    FieldStrategy { id: "topcard-h1", selector: "div.profile-topcard h1" },
    FieldStrategy { id: "topcard-class-h1", selector: r#"div[class*="profile-topcard"] h1"# },
    FieldStrategy { id: "lockup-title", selector: ".artdeco-entity-lockup__title" },
    FieldStrategy { id: "heading-xlarge", selector: "h1.text-heading-xlarge" },
    FieldStrategy { id: "pv-top-card-h1", selector: "div.pv-top-card h1" },
    FieldStrategy { id: "profile-section-h1", selector: r#"section[class*="profile"] h1"# },
];

const TITLE_STRATEGIES: &[FieldStrategy] = &[
    FieldStrategy { id: "topcard-headline", selector: ".profile-topcard__headline" },
    FieldStrategy { id: "topcard-entity-headline", selector: ".profile-topcard-person-entity__headline" },
    FieldStrategy { id: "topcard-body-medium", selector: "div.profile-topcard div.text-body-medium" },
    FieldStrategy { id: "topcard-class-headline", selector: r#"div[class*="profile-topcard"] div[class*="headline"]"# },
    FieldStrategy { id: "anonymize-title", selector: r#"[data-anonymize="title"]"# },
    FieldStrategy { id: "lockup-subtitle", selector: ".artdeco-entity-lockup__subtitle" },
    FieldStrategy { id: "pv-top-card-body", selector: "div.pv-top-card div.text-body-medium" },
    FieldStrategy { id: "topcard-span-body", selector: "div.profile-topcard span.text-body-medium" },
    FieldStrategy { id: "profile-span-body", selector: r#"div[class*="profile"] span.text-body-medium"# },
];

const COMPANY_STRATEGIES: &[FieldStrategy] = &[
    FieldStrategy { id: "topcard-company", selector: ".profile-topcard__company-name" },
    FieldStrategy { id: "anonymize-company", selector: r#"[data-anonymize="company-name"]"# },
    FieldStrategy { id: "current-company-button", selector: r#"button[aria-label*="Current company"]"# },
    FieldStrategy { id: "company-control", selector: r#"a[data-control-name*="company"]"# },
    FieldStrategy { id: "lockup-caption", selector: ".artdeco-entity-lockup__caption" },
];

// Navigation chrome that selectors occasionally misclassify as data.
const NAME_BLOCKLIST: &[&str] = &["Sales Navigator", "LinkedIn", "Page"];
const TITLE_BLOCKLIST: &[&str] = &["Message", "Connect", "Follow", "More", "Sales Navigator"];

const NEARBY_SIBLING_HOPS: usize = 5;

pub fn valid_name(text: &str) -> bool {
    let chars = text.chars().count();
    chars > 2 && chars < 100 && !NAME_BLOCKLIST.iter().any(|b| text.contains(b))
}

pub fn valid_title(text: &str) -> bool {
    let chars = text.chars().count();
    chars > 5
        && chars < 200
        && !TITLE_BLOCKLIST.iter().any(|b| text.contains(b))
        && !text.to_lowercase().contains("button")
}

pub fn valid_company(text: &str) -> bool {
    let chars = text.chars().count();
    chars > 1 && chars < 150
}

/// Run the strategy list in priority order; within a strategy, candidates are
/// taken in document order. First validated candidate wins.
fn run_strategies(
    doc: &Html,
    strategies: &[FieldStrategy],
    valid: impl Fn(&str) -> bool,
) -> Option<String> {
    for strategy in strategies {
        let Ok(sel) = Selector::parse(strategy.selector) else {
            continue;
        };
        for el in doc.select(&sel) {
            let text = element_text(&el);
            if valid(&text) {
                debug!(strategy = strategy.id, value = %text, "field resolved");
                return Some(text);
            }
        }
    }
    None
}

pub fn resolve_name(doc: &Html) -> Option<String> {
    run_strategies(doc, NAME_STRATEGIES, valid_name).or_else(|| name_from_page_title(doc))
}

pub fn resolve_title(doc: &Html, name: Option<&str>) -> Option<String> {
    run_strategies(doc, TITLE_STRATEGIES, valid_title)
        .or_else(|| name.and_then(|n| title_near_name(doc, n)))
}

pub fn resolve_company(doc: &Html, flat_text: &str) -> Option<String> {
    run_strategies(doc, COMPANY_STRATEGIES, valid_company)
        .or_else(|| company_from_text(flat_text))
}

/// Last-resort name source: the page title up to its first `|` separator.
fn name_from_page_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    let el = doc.select(&sel).next()?;
    let raw = element_text(&el);
    let candidate = raw.split('|').next()?.trim().to_string();
    if valid_name(&candidate) {
        debug!(value = %candidate, "name resolved from page title");
        Some(candidate)
    } else {
        None
    }
}

/// Layout convention fallback: the subtitle usually follows the name element
/// structurally. Walk the name element's following siblings (bounded), then
/// try the parent's immediate next sibling.
fn title_near_name(doc: &Html, name: &str) -> Option<String> {
    let sel = Selector::parse("h1, div, span").ok()?;
    let name_el = doc.select(&sel).find(|el| element_text(el) == name)?;

    for sib in name_el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(NEARBY_SIBLING_HOPS)
    {
        let text = element_text(&sib);
        if text != name && valid_title(&text) {
            debug!(value = %text, "title resolved from sibling of name");
            return Some(text);
        }
    }

    let parent = name_el.parent()?;
    let next = parent.next_siblings().filter_map(ElementRef::wrap).next()?;
    let text = element_text(&next);
    if text != name && valid_title(&text) {
        debug!(value = %text, "title resolved from parent's next sibling");
        return Some(text);
    }
    None
}

/// Scan the flattened page text for an "at CompanyName" mention, terminated
/// by `|` or end of line.
fn company_from_text(flat_text: &str) -> Option<String> {
    let candidate = COMPANY_AT_RE
        .captures(flat_text)
        .map(|c| c[1].trim().to_string())?;
    if valid_company(&candidate) {
        debug!(value = %candidate, "company resolved from page text");
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn name_from_topcard_selector() {
        let d = doc(r#"<div class="profile-topcard__name">Jane Doe</div>"#);
        assert_eq!(resolve_name(&d).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_priority_prefers_earlier_strategy() {
        // Both selectors match; the topcard strategy outranks the lockup one.
        let d = doc(concat!(
            r#"<div class="artdeco-entity-lockup__title">Wrong Person</div>"#,
            r#"<div class="profile-topcard__name">Jane Doe</div>"#,
        ));
        assert_eq!(resolve_name(&d).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_rejects_navigation_chrome() {
        // The only structural match is chrome; fall through to nothing.
        let html = r#"<html><head><title></title></head><body><div class="profile-topcard__name">Sales Navigator</div></body></html>"#;
        let d = Html::parse_document(html);
        assert_eq!(resolve_name(&d), None);
    }

    #[test]
    fn name_falls_back_to_page_title() {
        let html = r#"<html><head><title>Jane Doe | Sales Navigator</title></head><body></body></html>"#;
        let d = Html::parse_document(html);
        assert_eq!(resolve_name(&d).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_length_bounds_enforced() {
        let d = doc(r#"<div class="profile-topcard__name">Jo</div>"#);
        assert_eq!(run_strategies(&d, NAME_STRATEGIES, valid_name), None);
    }

    #[test]
    fn length_bounds_count_characters_not_bytes() {
        // "Áo" is 2 chars but 3 bytes; byte-length bounds would let it pass.
        assert!(!valid_name("Áo"));
        assert!(valid_name("Áke Öberg"));
        assert!(!valid_title("Chefs"));
        assert!(!valid_company("É"));
    }

    #[test]
    fn title_rejects_action_buttons() {
        let d = doc(concat!(
            r#"<div class="profile-topcard__headline">Message Jane</div>"#,
            r#"<div class="artdeco-entity-lockup__subtitle">VP of Engineering</div>"#,
        ));
        assert_eq!(resolve_title(&d, None).as_deref(), Some("VP of Engineering"));
    }

    #[test]
    fn title_rejects_button_case_insensitively() {
        let d = doc(r#"<div class="profile-topcard__headline">Primary BUTTON label</div>"#);
        assert_eq!(resolve_title(&d, None), None);
    }

    #[test]
    fn title_found_next_to_name_element() {
        let d = doc(concat!(
            "<div>",
            "<h1>Jane Doe</h1>",
            "<span>Follow</span>",
            "<span>VP of Engineering at Initech</span>",
            "</div>",
        ));
        assert_eq!(
            resolve_title(&d, Some("Jane Doe")).as_deref(),
            Some("VP of Engineering at Initech")
        );
    }

    #[test]
    fn title_sibling_walk_is_bounded() {
        let fillers: String = (0..6).map(|_| "<span>...</span>".to_string()).collect();
        let d = doc(&format!(
            "<div><h1>Jane Doe</h1>{}<span>VP of Engineering</span></div>",
            fillers
        ));
        assert_eq!(resolve_title(&d, Some("Jane Doe")), None);
    }

    #[test]
    fn title_found_in_parents_next_sibling() {
        let d = doc(concat!(
            "<div><h1>Jane Doe</h1></div>",
            "<div>Director of Platform Engineering</div>",
        ));
        assert_eq!(
            resolve_title(&d, Some("Jane Doe")).as_deref(),
            Some("Director of Platform Engineering")
        );
    }

    #[test]
    fn company_from_structural_selector() {
        let d = doc(r#"<span data-anonymize="company-name">Initech</span>"#);
        assert_eq!(resolve_company(&d, "").as_deref(), Some("Initech"));
    }

    #[test]
    fn company_falls_back_to_at_pattern() {
        let d = doc("<p>profile</p>");
        let text = "Jane Doe\nVP of Engineering\nworks at Acme Corp | Home\n";
        assert_eq!(resolve_company(&d, text).as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn company_at_pattern_needs_word_boundary() {
        // "What Services" must not produce a match via the trailing "at".
        assert_eq!(company_from_text("What Services we offer"), None);
    }

    #[test]
    fn company_at_pattern_stops_at_line_end() {
        let text = "building data teams at Initech\nExperience\n";
        assert_eq!(company_from_text(text).as_deref(), Some("Initech"));
    }
}
