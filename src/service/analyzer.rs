//! Deduction-based on-page checklist.
//!
//! The scoring policy is the [`CHECKS`] table: an ordered list of
//! `{fails, penalty, issue, fix}` records evaluated once, in order.

use crate::domain::models::ScanResult;
use crate::extractor::{PageDocument, PageExtractor, PageFacts};
use crate::service::http::FetchedPage;
use crate::service::platform::detect_platform;

pub const MAX_SCORE: i64 = 100;
pub const MIN_SCORE: i64 = 0;
pub const PENALTY: i64 = 10;

const MAX_MISSING_ALT: usize = 5;
const MIN_LINKS: usize = 5;
const MIN_BODY_LENGTH: usize = 500;

/// One checklist entry.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub fails: fn(&PageFacts) -> bool,
    pub penalty: i64,
    pub issue: &'static str,
    pub fix: &'static str,
}

fn missing_title(facts: &PageFacts) -> bool {
    facts.title.is_none()
}

fn missing_meta_description(facts: &PageFacts) -> bool {
    facts.meta_description.is_none()
}

fn missing_h1(facts: &PageFacts) -> bool {
    facts.h1_count == 0
}

fn many_images_missing_alt(facts: &PageFacts) -> bool {
    facts.missing_alt_count > MAX_MISSING_ALT
}

fn too_few_links(facts: &PageFacts) -> bool {
    facts.link_count < MIN_LINKS
}

fn content_too_short(facts: &PageFacts) -> bool {
    facts.body_length < MIN_BODY_LENGTH
}

fn missing_viewport(facts: &PageFacts) -> bool {
    !facts.has_viewport
}

fn missing_structured_data(facts: &PageFacts) -> bool {
    !facts.has_structured_data
}

pub const CHECKS: &[Check] = &[
    Check {
        fails: missing_title,
        penalty: PENALTY,
        issue: "Missing title tag",
        fix: "Add a unique, descriptive <title> inside <head>.",
    },
    Check {
        fails: missing_meta_description,
        penalty: PENALTY,
        issue: "Missing meta description",
        fix: "Add <meta name=\"description\" content=\"...\"> summarising the page.",
    },
    Check {
        fails: missing_h1,
        penalty: PENALTY,
        issue: "No H1 tag found",
        fix: "Add one <h1> heading with the page's main topic near the top of the body.",
    },
    Check {
        fails: many_images_missing_alt,
        penalty: PENALTY,
        issue: "Many images missing alt attributes",
        fix: "Give every <img> a short alt text describing the image.",
    },
    Check {
        fails: too_few_links,
        penalty: PENALTY,
        issue: "Not enough internal/external links",
        fix: "Link to related pages on your site and to relevant external sources.",
    },
    Check {
        fails: content_too_short,
        penalty: PENALTY,
        issue: "Page content too short",
        fix: "Add more useful text content to the page.",
    },
    Check {
        fails: missing_viewport,
        penalty: PENALTY,
        issue: "Not mobile-friendly",
        fix: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
    },
    Check {
        fails: missing_structured_data,
        penalty: PENALTY,
        issue: "No structured data found",
        fix: "Add a JSON-LD <script type=\"application/ld+json\"> block describing the site.",
    },
];

/// Score plus findings produced by a checklist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub score: i64,
    pub issues: Vec<String>,
    pub fixes: Vec<String>,
}

/// Run `checks` against `facts`. The score is clamped to [0, 100] whatever
/// the table contains.
pub fn run_checks(facts: &PageFacts, checks: &[Check]) -> Analysis {
    let mut score = MAX_SCORE;
    let mut issues = Vec::new();
    let mut fixes = Vec::new();

    for check in checks.iter().filter(|c| (c.fails)(facts)) {
        score -= check.penalty;
        issues.push(check.issue.to_string());
        fixes.push(check.fix.to_string());
    }

    Analysis {
        score: score.clamp(MIN_SCORE, MAX_SCORE),
        issues,
        fixes,
    }
}

/// Analyze a fetched page. Pure: the same input always yields the same result.
pub fn analyze(page: &FetchedPage, document: &PageDocument) -> ScanResult {
    let facts = PageExtractor::extract(document);
    let analysis = run_checks(&facts, CHECKS);

    log::debug!(
        "[ANALYZE] {} scored {} with {} issue(s)",
        page.url,
        analysis.score,
        analysis.issues.len()
    );

    ScanResult {
        url: page.url.to_string(),
        status_code: page.status_code,
        title: facts.title,
        meta_description: facts.meta_description,
        h1_count: facts.h1_count,
        missing_alt_count: facts.missing_alt_count,
        link_count: facts.link_count,
        load_time_seconds: page.load_time_seconds(),
        score: analysis.score,
        issues: analysis.issues,
        fixes: analysis.fixes,
        platform: detect_platform(document.raw()),
        fixed_page_path: None,
    }
}
