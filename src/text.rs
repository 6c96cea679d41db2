use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Account has.*?intent|Buyer intent|Save to list|Send InMail|View similar|Show more|Show less")
        .unwrap()
});
static ABOUT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^about\s*").unwrap());

// Tags that break the text flow the way innerText does.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];
const SKIP_TAGS: &[&str] = &["head", "noscript", "script", "style", "svg", "template", "title"];

/// Flatten a parsed document into visible text, one newline per block boundary.
pub fn flatten_text(doc: &Html) -> String {
    let mut out = String::new();
    collect_text(doc.root_element(), &mut out);
    out
}

/// Flatten a single element subtree and rejoin its trimmed, non-empty lines.
pub fn element_text_block(el: &ElementRef) -> String {
    let mut out = String::new();
    collect_text(*el, &mut out);
    text_lines(&out).join("\n")
}

fn collect_text(el: ElementRef, out: &mut String) {
    let name = el.value().name();
    if SKIP_TAGS.contains(&name) {
        return;
    }
    let block = BLOCK_TAGS.contains(&name);
    if block {
        out.push('\n');
    }
    for child in el.children() {
        if let Some(t) = child.value().as_text() {
            out.push_str(&t.text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_text(child_el, out);
        }
    }
    if block {
        out.push('\n');
    }
}

/// Split flattened text into the ordered stream of trimmed, non-empty lines.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Element text with all internal whitespace collapsed to single spaces.
pub fn element_text(el: &ElementRef) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip known platform boilerplate from an accepted biography, then re-trim
/// each line and drop the ones the removal emptied out.
pub fn clean_bio(bio: &str) -> String {
    let stripped = BOILERPLATE_RE.replace_all(bio, "");
    let lines: Vec<String> = stripped
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect();
    lines.join("\n")
}

/// Remove a leading "About" section label, as container selectors often
/// capture the heading together with the content.
pub fn strip_about_label(text: &str) -> String {
    ABOUT_LABEL_RE.replace(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_inserts_line_breaks_at_blocks() {
        let doc = Html::parse_document(
            "<html><body><div>About</div><p>First para</p><span>inline </span><span>run</span></body></html>",
        );
        let lines = text_lines(&flatten_text(&doc));
        assert_eq!(lines, vec!["About", "First para", "inline run"]);
    }

    #[test]
    fn flatten_skips_script_and_style() {
        let doc = Html::parse_document(
            "<html><head><title>T</title><style>.x{}</style></head><body><script>var a=1;</script><p>Visible</p></body></html>",
        );
        let lines = text_lines(&flatten_text(&doc));
        assert_eq!(lines, vec!["Visible"]);
    }

    #[test]
    fn element_text_collapses_whitespace() {
        let doc = Html::parse_document("<html><body><h1>  Jane\n   Doe </h1></body></html>");
        let sel = scraper::Selector::parse("h1").unwrap();
        let el = doc.select(&sel).next().unwrap();
        assert_eq!(element_text(&el), "Jane Doe");
    }

    #[test]
    fn clean_bio_strips_boilerplate_case_insensitively() {
        let bio = "I build data teams. show more\nBuyer Intent\nSave to list\nReal second line.";
        assert_eq!(clean_bio(bio), "I build data teams.\nReal second line.");
    }

    #[test]
    fn clean_bio_strips_account_intent_span() {
        let bio = "Account has strong buying intent Leading platform teams since 2015.";
        assert_eq!(clean_bio(bio), "Leading platform teams since 2015.");
    }

    #[test]
    fn about_label_stripped_only_at_start() {
        assert_eq!(
            strip_about_label("About Passionate about developer tools."),
            "Passionate about developer tools."
        );
        assert_eq!(
            strip_about_label("Curious about everything."),
            "Curious about everything."
        );
    }
}
