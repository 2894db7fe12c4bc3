use serde::Serialize;

use crate::domain::models::ScanResult;
use crate::error::CommandError;
use crate::lifecycle::AppState;
use crate::service::ScanRequest;

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub result: ScanResult,
    /// `(name, value)` pairs as displayed, also the input for a report
    pub fields: Vec<(String, String)>,
    /// File name to pass to `get_fixed_page`
    pub fixed_page: Option<String>,
}

impl From<ScanResult> for ScanResponse {
    fn from(result: ScanResult) -> Self {
        let fixed_page = result
            .fixed_page_path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        Self {
            fields: result.display_fields(),
            fixed_page,
            result,
        }
    }
}

pub async fn scan_site(
    state: &AppState,
    url: String,
    owner: bool,
) -> Result<ScanResponse, CommandError> {
    log::info!("Scan requested: {} (owner: {})", url, owner);

    let result = state
        .scan
        .scan(&ScanRequest::new(url, owner))
        .await
        .map_err(|e| {
            log::error!("Scan failed: {}", e);
            CommandError::from(e)
        })?;

    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Platform;
    use std::path::PathBuf;

    #[test]
    fn response_exposes_fixed_page_name_only() {
        let result = ScanResult {
            url: "https://example.com/".into(),
            status_code: 200,
            title: None,
            meta_description: None,
            h1_count: 0,
            missing_alt_count: 0,
            link_count: 0,
            load_time_seconds: 0.5,
            score: 60,
            issues: vec!["Missing title tag".into()],
            fixes: vec!["Add a title".into()],
            platform: Platform::Custom,
            fixed_page_path: Some(PathBuf::from("/data/fixed_pages/fixed_abc.html")),
        };

        let response = ScanResponse::from(result);

        assert_eq!(response.fixed_page.as_deref(), Some("fixed_abc.html"));
        assert!(response
            .fields
            .contains(&("title".to_string(), "No title found".to_string())));
    }
}
