//! Scan entities - what a single scan produces and what gets persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ====== Enums ======

/// Hosting platform guessed from the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    WordPress,
    Shopify,
    Wix,
    Squarespace,
    Custom,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WordPress => "WordPress",
            Platform::Shopify => "Shopify",
            Platform::Wix => "Wix",
            Platform::Squarespace => "Squarespace",
            Platform::Custom => "Custom",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wordpress" => Ok(Platform::WordPress),
            "shopify" => Ok(Platform::Shopify),
            "wix" => Ok(Platform::Wix),
            "squarespace" => Ok(Platform::Squarespace),
            "custom" => Ok(Platform::Custom),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

// ====== Entities ======

/// Outcome of one scan. Built once per request and never persisted whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub status_code: u16,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub missing_alt_count: usize,
    pub link_count: usize,
    pub load_time_seconds: f64,
    pub score: i64,
    pub issues: Vec<String>,
    /// Parallel to `issues`
    pub fixes: Vec<String>,
    pub platform: Platform,
    pub fixed_page_path: Option<PathBuf>,
}

impl ScanResult {
    /// Issue and suggested fix pairs, in checklist order.
    pub fn findings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.issues
            .iter()
            .map(String::as_str)
            .zip(self.fixes.iter().map(String::as_str))
    }

    /// Named fields as shown to the user, in display order.
    /// These are what a downloaded report lists.
    pub fn display_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("url".to_string(), self.url.clone()),
            (
                "title".to_string(),
                self.title
                    .clone()
                    .unwrap_or_else(|| "No title found".to_string()),
            ),
            (
                "meta description".to_string(),
                self.meta_description
                    .clone()
                    .unwrap_or_else(|| "No meta description found".to_string()),
            ),
            ("h1 count".to_string(), self.h1_count.to_string()),
            ("missing alt".to_string(), self.missing_alt_count.to_string()),
            ("link count".to_string(), self.link_count.to_string()),
            (
                "load time".to_string(),
                format!("{:.2} s", self.load_time_seconds),
            ),
            ("seo score".to_string(), self.score.to_string()),
            ("platform".to_string(), self.platform.to_string()),
            ("issues".to_string(), self.issues.join("; ")),
        ];
        if let Some(path) = &self.fixed_page_path {
            fields.push(("fixed page".to_string(), path.display().to_string()));
        }
        fields
    }
}

/// One row of the append-only scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub score: i64,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScanResult {
        ScanResult {
            url: "https://example.com/".into(),
            status_code: 200,
            title: None,
            meta_description: Some("A shop".into()),
            h1_count: 1,
            missing_alt_count: 0,
            link_count: 7,
            load_time_seconds: 0.5,
            score: 80,
            issues: vec!["No H1 tag found".into(), "Not mobile-friendly".into()],
            fixes: vec!["Add an H1".into(), "Add a viewport".into()],
            platform: Platform::Shopify,
            fixed_page_path: None,
        }
    }

    #[test]
    fn display_fields_render_absent_title_explicitly() {
        let fields = sample().display_fields();
        let title = fields.iter().find(|(k, _)| k == "title").unwrap();
        assert_eq!(title.1, "No title found");
        assert!(fields.iter().all(|(k, _)| k != "fixed page"));
    }

    #[test]
    fn findings_pair_issues_with_fixes() {
        let result = sample();
        let pairs: Vec<_> = result.findings().collect();
        assert_eq!(pairs[1], ("Not mobile-friendly", "Add a viewport"));
    }

    #[test]
    fn platform_round_trips_through_display() {
        for p in [
            Platform::WordPress,
            Platform::Shopify,
            Platform::Wix,
            Platform::Squarespace,
            Platform::Custom,
        ] {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
    }
}
