//! Scan pipeline.
//!
//! validate -> fetch -> parse -> analyze -> record -> (fix, when owned)

use url::Url;

use crate::domain::models::ScanResult;
use crate::error::{AppError, Result};
use crate::extractor::PageDocument;
use crate::repository::HistoryRepository;
use crate::service::analyzer::analyze;
use crate::service::auto_fixer::fix_page;
use crate::service::fixed_pages::FixedPageStore;
use crate::service::http::{FetchedPage, Fetcher};

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub url: String,
    /// Caller asserts they own the site and wants a corrected copy.
    pub owner: bool,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>, owner: bool) -> Self {
        Self {
            url: url.into(),
            owner,
        }
    }
}

/// Accept only absolute `http://` / `https://` URLs.
pub fn validate_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(AppError::InvalidUrl(input.to_string()));
    }

    let url = Url::parse(trimmed).map_err(|_| AppError::InvalidUrl(input.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidUrl(input.to_string()));
    }
    Ok(url)
}

#[derive(Clone)]
pub struct ScanService {
    fetcher: Fetcher,
    history: HistoryRepository,
    fixed_pages: FixedPageStore,
}

impl ScanService {
    pub fn new(fetcher: Fetcher, history: HistoryRepository, fixed_pages: FixedPageStore) -> Self {
        Self {
            fetcher,
            history,
            fixed_pages,
        }
    }

    #[tracing::instrument(skip(self, request), fields(url = %request.url, owner = request.owner))]
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult> {
        let url = validate_url(&request.url)?;
        log::info!("[SCAN] Starting scan of {}", url);

        let page = self.fetcher.fetch(&url).await.map_err(|e| {
            log::warn!("[SCAN] Fetch of {} failed: {:?}", url, e);
            AppError::from(e)
        })?;

        let (mut result, fixed_markup) = inspect(&page, &url, request.owner);

        // logged as submitted, not as finally resolved
        self.history
            .record(request.url.trim(), result.score)
            .await
            .map_err(|e| AppError::database(format!("{:#}", e)))?;

        if let Some(markup) = fixed_markup {
            result.fixed_page_path = Some(self.fixed_pages.save(&markup).await?);
        }

        log::info!(
            "[SCAN] {} scored {} ({} issue(s), platform {})",
            result.url,
            result.score,
            result.issues.len(),
            result.platform
        );
        Ok(result)
    }
}

/// Parse once, analyze, and compute the corrected document when asked.
/// Kept synchronous: the parsed tree never crosses an await point.
fn inspect(page: &FetchedPage, source: &Url, owner: bool) -> (ScanResult, Option<String>) {
    let document = PageDocument::parse(&page.body);
    let result = analyze(page, &document);
    let fixed = owner.then(|| fix_page(source, &document).markup);
    (result, fixed)
}
