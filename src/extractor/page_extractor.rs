use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

use super::document::PageDocument;

/// On-page facts the checklist looks at. Absent values are `None`,
/// never a sentinel string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFacts {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub missing_alt_count: usize,
    pub link_count: usize,
    /// Length of the raw response body in characters
    pub body_length: usize,
    pub has_viewport: bool,
    pub has_structured_data: bool,
}

/// An image needs alt text unless it carries a non-empty `alt`.
pub fn lacks_alt(img: &ElementRef) -> bool {
    img.value().attr("alt").map_or(true, str::is_empty)
}

pub struct PageExtractor;

impl PageExtractor {
    pub fn extract(document: &PageDocument) -> PageFacts {
        PageFacts {
            title: Self::extract_title(document),
            meta_description: Self::extract_meta_description(document),
            h1_count: Self::count_h1(document),
            missing_alt_count: Self::count_images_missing_alt(document),
            link_count: Self::count_links(document),
            body_length: document.raw().chars().count(),
            has_viewport: Self::has_viewport(document),
            has_structured_data: Self::has_structured_data(document),
        }
    }

    pub fn extract_title(document: &PageDocument) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("title").unwrap());
        document
            .first(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn extract_meta_description(document: &PageDocument) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='description']").unwrap());
        document
            .first(selector)
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn count_h1(document: &PageDocument) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("h1").unwrap());
        document.count(selector)
    }

    pub fn count_images_missing_alt(document: &PageDocument) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("img").unwrap());
        document.select(selector).filter(lacks_alt).count()
    }

    /// Anchors carrying an href, whatever it points at.
    pub fn count_links(document: &PageDocument) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());
        document.count(selector)
    }

    pub fn has_viewport(document: &PageDocument) -> bool {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("meta[name='viewport']").unwrap());
        document.first(selector).is_some()
    }

    pub fn has_structured_data(document: &PageDocument) -> bool {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR
            .get_or_init(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
        document.first(selector).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_and_description_are_absent() {
        let html = r#"<html><head><title>   </title><meta name="description" content=""></head></html>"#;
        let facts = PageExtractor::extract(&PageDocument::parse(html));
        assert_eq!(facts.title, None);
        assert_eq!(facts.meta_description, None);
    }

    #[test]
    fn meta_description_without_content_is_absent() {
        let html = r#"<html><head><meta name="description"></head></html>"#;
        let facts = PageExtractor::extract(&PageDocument::parse(html));
        assert_eq!(facts.meta_description, None);
    }

    #[test]
    fn page_literally_titled_like_a_sentinel_is_present() {
        let html = "<html><head><title>No title found</title></head></html>";
        let facts = PageExtractor::extract(&PageDocument::parse(html));
        assert_eq!(facts.title.as_deref(), Some("No title found"));
    }

    #[test]
    fn counts_alt_less_images_and_href_anchors() {
        let html = r#"
            <body>
                <img src="a.png">
                <img src="b.png" alt="">
                <img src="c.png" alt="Chart">
                <a href="/one">one</a>
                <a href="">empty href still counts</a>
                <a name="anchor">no href</a>
            </body>
        "#;
        let facts = PageExtractor::extract(&PageDocument::parse(html));
        assert_eq!(facts.missing_alt_count, 2);
        assert_eq!(facts.link_count, 2);
    }

    #[test]
    fn detects_viewport_and_json_ld() {
        let html = r#"
            <head>
                <meta name="viewport" content="width=device-width">
                <script type="application/ld+json">{"@type":"Thing"}</script>
            </head>
        "#;
        let facts = PageExtractor::extract(&PageDocument::parse(html));
        assert!(facts.has_viewport);
        assert!(facts.has_structured_data);

        let plain = PageExtractor::extract(&PageDocument::parse("<script>var a;</script>"));
        assert!(!plain.has_viewport);
        assert!(!plain.has_structured_data);
    }

    #[test]
    fn body_length_counts_characters_not_bytes() {
        let facts = PageExtractor::extract(&PageDocument::parse("ééé"));
        assert_eq!(facts.body_length, 3);
    }
}
