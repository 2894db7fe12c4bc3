use scraper::{ElementRef, Html, Selector};

/// A fetched page parsed once and shared by the analyzer and the auto-fixer.
///
/// Parsing never fails: malformed markup yields a tree where lookups
/// simply find nothing.
pub struct PageDocument<'a> {
    raw: &'a str,
    html: Html,
}

impl<'a> PageDocument<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            html: Html::parse_document(raw),
        }
    }

    /// Markup exactly as received.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select<'s>(&'s self, selector: &'s Selector) -> impl Iterator<Item = ElementRef<'s>> + 's {
        self.html.select(selector)
    }

    pub fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }
}
