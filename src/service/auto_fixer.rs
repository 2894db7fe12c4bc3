//! Inserts missing standard elements into a page.
//!
//! What is missing is decided on the parsed tree (the same facts the analyzer
//! uses); the edits are spliced into the original markup so everything that
//! is already compliant stays byte-for-byte identical.

use regex::{Match, Regex};
use serde_json::json;
use std::ops::Range;
use std::sync::OnceLock;
use url::Url;

use crate::extractor::page_extractor::PageExtractor;
use crate::extractor::PageDocument;

pub const PLACEHOLDER_TITLE: &str = "Home Page";
pub const PLACEHOLDER_DESCRIPTION: &str = "Welcome to our website.";
pub const VIEWPORT_CONTENT: &str = "width=device-width, initial-scale=1";
pub const PLACEHOLDER_SITE_NAME: &str = "My Website";
pub const PLACEHOLDER_ALT: &str = "Image description";
pub const PLACEHOLDER_HEADING: &str = "Welcome";

/// Attribute list of a start tag; quoted values may contain `>`.
const ATTRS: &str = r#"(?:[^>"']|"[^"]*"|'[^']*')*"#;

/// Corrected markup plus the rules that fired, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub markup: String,
    pub applied: Vec<&'static str>,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

fn start_tag(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)<{}(?:\s{})?>", name, ATTRS)).unwrap()
}

fn head_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| start_tag("head"))
}

fn html_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| start_tag("html"))
}

fn body_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| start_tag("body"))
}

fn head_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</head\s*>").unwrap())
}

fn doctype() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<!doctype[^>]*>").unwrap())
}

fn title_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?is)(<title(?:\s{})?>)(.*?)(</title\s*>)", ATTRS)).unwrap()
    })
}

fn meta_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(?i)<meta\b{}>", ATTRS)).unwrap())
}

fn img_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(?i)<img\b{}>", ATTRS)).unwrap())
}

/// Comments and raw-text elements; tags inside them are not markup.
fn opaque_region() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?is)<!--.*?(?:-->|\z)",
            r"|<(script|style|noscript|textarea)\b[^>]*>.*?(?:</(?:script|style|noscript|textarea)\s*>|\z)",
        ))
        .unwrap()
    })
}

fn opaque_ranges(markup: &str) -> Vec<Range<usize>> {
    opaque_region().find_iter(markup).map(|m| m.range()).collect()
}

fn is_opaque(opaque: &[Range<usize>], at: usize) -> bool {
    opaque.iter().any(|r| r.contains(&at))
}

/// Matches of `pattern` that sit in live markup.
fn live_matches<'h>(
    pattern: &'static Regex,
    markup: &'h str,
    opaque: &'h [Range<usize>],
) -> impl Iterator<Item = Match<'h>> + 'h {
    pattern
        .find_iter(markup)
        .filter(move |m| !is_opaque(opaque, m.start()))
}

fn first_live<'h>(pattern: &'static Regex, markup: &'h str) -> Option<Match<'h>> {
    let opaque = opaque_ranges(markup);
    pattern
        .find_iter(markup)
        .find(|m| !is_opaque(&opaque, m.start()))
}

fn attribute(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)\s{}(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))|\b)"#,
        regex::escape(name)
    ))
    .unwrap()
}

fn alt_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("alt"))
}

fn name_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("name"))
}

fn content_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("content"))
}

/// Value of an attribute inside a single start tag. A bare attribute is `""`.
fn attribute_value(tag: &str, pattern: &Regex) -> Option<String> {
    pattern.captures(tag).map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    })
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Replace (or add) one attribute of a start tag.
fn set_attribute(tag: &str, pattern: &Regex, name: &str, value: &str) -> String {
    let attr = format!(r#" {}="{}""#, name, escape_attr(value));
    if let Some(m) = pattern.find(tag) {
        return format!("{}{}{}", &tag[..m.start()], attr, &tag[m.end()..]);
    }
    let end = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    format!("{}{}{}", tag[..end].trim_end(), attr, &tag[end..])
}

fn splice(markup: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(markup.len() + replacement.len());
    out.push_str(&markup[..range.start]);
    out.push_str(replacement);
    out.push_str(&markup[range.end..]);
    out
}

fn insert_at(markup: &str, at: usize, text: &str) -> String {
    splice(markup, at..at, text)
}

/// Fill the first live `<title>` element in place. `None` if there is none.
fn fill_title(markup: &str) -> Option<String> {
    let opaque = opaque_ranges(markup);
    let caps = title_element()
        .captures_iter(markup)
        .find(|caps| caps.get(0).map_or(false, |m| !is_opaque(&opaque, m.start())))?;
    let inner = caps.get(2)?;
    Some(splice(markup, inner.range(), PLACEHOLDER_TITLE))
}

/// Fill the content of the first live description meta tag in place.
fn fill_meta_description(markup: &str) -> Option<String> {
    let opaque = opaque_ranges(markup);
    let filled = live_matches(meta_tag(), markup, &opaque)
        .find(|m| attribute_value(m.as_str(), name_attr()).as_deref() == Some("description"))
        .map(|m| {
            let fixed = set_attribute(
                m.as_str(),
                content_attr(),
                "content",
                PLACEHOLDER_DESCRIPTION,
            );
            splice(markup, m.range(), &fixed)
        });
    filled
}

/// Keep an in-place fill only if the parser now sees what it was meant to add.
fn confirmed(filled: Option<String>, present: fn(&PageDocument) -> bool) -> Option<String> {
    filled.filter(|markup| present(&PageDocument::parse(markup)))
}

fn insert_into_head(markup: &str, snippets: &[String]) -> String {
    let block = snippets.join("\n");
    if let Some(m) = first_live(head_open(), markup) {
        return insert_at(markup, m.end(), &format!("\n{}", block));
    }
    let head = format!("\n<head>\n{}\n</head>", block);
    if let Some(m) = first_live(html_open(), markup) {
        return insert_at(markup, m.end(), &head);
    }
    if let Some(m) = doctype().find(markup) {
        return insert_at(markup, m.end(), &head);
    }
    format!("{}\n{}", head.trim_start(), markup)
}

fn insert_heading(markup: &str) -> String {
    let heading = format!("\n<h1>{}</h1>", PLACEHOLDER_HEADING);
    let anchor = first_live(body_open(), markup)
        .or_else(|| first_live(head_close(), markup))
        .or_else(|| first_live(html_open(), markup))
        .or_else(|| doctype().find(markup));
    match anchor {
        Some(m) => insert_at(markup, m.end(), &heading),
        None => format!("{}\n{}", heading.trim_start(), markup),
    }
}

fn fix_images(markup: &str) -> String {
    let opaque = opaque_ranges(markup);
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;

    for m in live_matches(img_tag(), markup, &opaque) {
        let tag = m.as_str();
        let needs_alt = attribute_value(tag, alt_attr()).map_or(true, |v| v.is_empty());
        if needs_alt {
            out.push_str(&markup[last..m.start()]);
            out.push_str(&set_attribute(tag, alt_attr(), "alt", PLACEHOLDER_ALT));
            last = m.end();
        }
    }
    out.push_str(&markup[last..]);
    out
}

fn structured_data_block(url: &Url) -> String {
    let data = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": PLACEHOLDER_SITE_NAME,
        "url": url.as_str(),
    });
    // keep the payload from closing the script element early
    let payload = data.to_string().replace("</", "<\\/");
    format!(r#"<script type="application/ld+json">{}</script>"#, payload)
}

/// Compute the corrected document for an already parsed page.
pub fn fix_page(url: &Url, document: &PageDocument) -> FixOutcome {
    let facts = PageExtractor::extract(document);
    let mut markup = document.raw().to_string();
    let mut applied = Vec::new();
    let mut head_snippets = Vec::new();

    if facts.title.is_none() {
        match confirmed(fill_title(&markup), |d| PageExtractor::extract_title(d).is_some()) {
            Some(filled) => markup = filled,
            None => head_snippets.push(format!("<title>{}</title>", PLACEHOLDER_TITLE)),
        }
        applied.push("title");
    }

    if facts.meta_description.is_none() {
        match confirmed(fill_meta_description(&markup), |d| {
            PageExtractor::extract_meta_description(d).is_some()
        }) {
            Some(filled) => markup = filled,
            None => head_snippets.push(format!(
                r#"<meta name="description" content="{}">"#,
                PLACEHOLDER_DESCRIPTION
            )),
        }
        applied.push("meta description");
    }

    if !facts.has_viewport {
        head_snippets.push(format!(
            r#"<meta name="viewport" content="{}">"#,
            VIEWPORT_CONTENT
        ));
        applied.push("viewport");
    }

    if !facts.has_structured_data {
        head_snippets.push(structured_data_block(url));
        applied.push("structured data");
    }

    if !head_snippets.is_empty() {
        markup = insert_into_head(&markup, &head_snippets);
    }

    if facts.missing_alt_count > 0 {
        markup = fix_images(&markup);
        applied.push("image alt text");
    }

    if facts.h1_count == 0 {
        markup = insert_heading(&markup);
        applied.push("h1");
    }

    log::debug!("[FIX] {} rule(s) applied for {}: {:?}", applied.len(), url, applied);

    FixOutcome { markup, applied }
}

/// Parse `raw` and compute its corrected document.
pub fn fix_markup(url: &Url, raw: &str) -> FixOutcome {
    fix_page(url, &PageDocument::parse(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mocks::{bare_page, compliant_page};

    fn url() -> Url {
        Url::parse("https://studio.example/").unwrap()
    }

    #[test]
    fn compliant_page_is_left_untouched() {
        let page = compliant_page();
        let outcome = fix_markup(&url(), &page);

        assert!(!outcome.changed(), "unexpected rules: {:?}", outcome.applied);
        assert_eq!(outcome.markup, page);
    }

    #[test]
    fn bare_page_gets_every_rule_in_order() {
        let outcome = fix_markup(&url(), &bare_page());

        assert_eq!(
            outcome.applied,
            vec![
                "title",
                "meta description",
                "viewport",
                "structured data",
                "image alt text",
                "h1"
            ]
        );

        let facts = PageExtractor::extract(&PageDocument::parse(&outcome.markup));
        assert_eq!(facts.title.as_deref(), Some(PLACEHOLDER_TITLE));
        assert_eq!(facts.meta_description.as_deref(), Some(PLACEHOLDER_DESCRIPTION));
        assert!(facts.has_viewport);
        assert!(facts.has_structured_data);
        assert_eq!(facts.missing_alt_count, 0);
        assert_eq!(facts.h1_count, 1);
    }

    #[test]
    fn fixing_twice_changes_nothing_the_second_time() {
        let once = fix_markup(&url(), &bare_page());
        let twice = fix_markup(&url(), &once.markup);

        assert!(!twice.changed(), "second pass applied {:?}", twice.applied);
        assert_eq!(twice.markup, once.markup);
    }

    #[test]
    fn structured_data_carries_the_page_url() {
        let outcome = fix_markup(&url(), "<html><head></head><body></body></html>");
        assert!(outcome.markup.contains(r#""url":"https://studio.example/""#));
        assert!(outcome.markup.contains(r#""@type":"WebSite""#));
        assert!(outcome.markup.contains(r#""name":"My Website""#));
    }

    #[test]
    fn existing_alt_text_is_kept_and_missing_alt_is_filled() {
        let html = r#"<html><head></head><body><img src="a.png" alt="Logo"><img src="b.png"><img src='c.png' alt="" /><img alt src="d.png"></body></html>"#;
        let outcome = fix_markup(&url(), html);

        assert!(outcome.markup.contains(r#"<img src="a.png" alt="Logo">"#));
        assert!(outcome.markup.contains(r#"<img src="b.png" alt="Image description">"#));
        assert!(outcome.markup.contains(r#"<img src='c.png' alt="Image description" />"#));
        assert!(outcome.markup.contains(r#"<img alt="Image description" src="d.png">"#));
    }

    #[test]
    fn alternate_attribute_is_not_mistaken_for_alt() {
        let html = r#"<body><h1>x</h1><img src="a.png" alternate="yes"></body>"#;
        let outcome = fix_markup(&url(), html);
        assert!(outcome
            .markup
            .contains(r#"<img src="a.png" alternate="yes" alt="Image description">"#));
    }

    #[test]
    fn empty_title_is_filled_in_place() {
        let html = "<html><head><title>  </title></head><body><h1>Hi</h1></body></html>";
        let outcome = fix_markup(&url(), html);

        assert!(outcome.markup.contains("<title>Home Page</title>"));
        assert_eq!(outcome.markup.matches("<title").count(), 1);
    }

    #[test]
    fn empty_meta_description_is_filled_in_place() {
        let html = r#"<html><head><meta name="description" content=""></head><body><h1>Hi</h1></body></html>"#;
        let outcome = fix_markup(&url(), html);

        assert!(outcome
            .markup
            .contains(r#"<meta name="description" content="Welcome to our website.">"#));
        assert_eq!(outcome.markup.matches(r#"name="description""#).count(), 1);
    }

    #[test]
    fn head_is_created_when_missing() {
        let outcome = fix_markup(&url(), "<html><body><header>Nav</header></body></html>");

        assert!(outcome.markup.starts_with("<html>\n<head>\n<title>Home Page</title>"));
        assert!(outcome.markup.contains("<header>Nav</header>"));
    }

    #[test]
    fn head_goes_after_doctype_when_there_is_no_html_tag() {
        let outcome = fix_markup(&url(), "<!DOCTYPE html>\n<p>Hello</p>");
        assert!(outcome.markup.starts_with("<!DOCTYPE html>\n<head>"));
    }

    #[test]
    fn heading_goes_to_top_of_body() {
        let html = r#"<html><head><title>T</title></head><body class="home"><p>Text</p></body></html>"#;
        let outcome = fix_markup(&url(), html);
        assert!(outcome
            .markup
            .contains("<body class=\"home\">\n<h1>Welcome</h1><p>Text</p>"));
    }

    #[test]
    fn commented_out_title_is_not_taken_as_the_title() {
        let html = "<!-- legacy <title>Old</title> --><html><head></head><body><h1>Hi</h1></body></html>";
        let outcome = fix_markup(&url(), html);

        assert!(outcome.applied.contains(&"title"));
        assert!(outcome.markup.starts_with("<!-- legacy <title>Old</title> -->"));
        let facts = PageExtractor::extract(&PageDocument::parse(&outcome.markup));
        assert_eq!(facts.title.as_deref(), Some(PLACEHOLDER_TITLE));

        let again = fix_markup(&url(), &outcome.markup);
        assert!(!again.changed(), "second pass applied {:?}", again.applied);
    }

    #[test]
    fn description_inside_noscript_is_not_filled() {
        let html = r#"<html><head><noscript><meta name="description" content=""></noscript></head><body><h1>Hi</h1></body></html>"#;
        let outcome = fix_markup(&url(), html);

        assert!(outcome
            .markup
            .contains(r#"<noscript><meta name="description" content=""></noscript>"#));
        let facts = PageExtractor::extract(&PageDocument::parse(&outcome.markup));
        assert_eq!(facts.meta_description.as_deref(), Some(PLACEHOLDER_DESCRIPTION));
    }

    #[test]
    fn tags_in_comments_are_never_edit_targets() {
        let html = r#"<!-- <head></head> <body> <img src="old.png"> --><html><body><p>Text</p></body></html>"#;
        let outcome = fix_markup(&url(), html);

        assert!(outcome
            .markup
            .starts_with(r#"<!-- <head></head> <body> <img src="old.png"> --><html>"#));
        assert!(outcome.markup.contains("<html>\n<head>\n<title>Home Page</title>"));
        assert!(outcome.markup.contains("<body>\n<h1>Welcome</h1><p>Text</p>"));
    }
}
