use serde::Serialize;

use crate::error::CommandError;
use crate::service::report::{render_report, REPORT_FILE_NAME, REPORT_MIME};

/// A rendered report ready to hand to the user.
#[derive(Debug, Serialize)]
pub struct ReportDownload {
    pub file_name: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Render the submitted `(name, value)` fields, in order, as a PDF.
pub fn export_report(fields: &[(String, String)]) -> Result<ReportDownload, CommandError> {
    let bytes = render_report(fields).map_err(CommandError::from)?;
    log::info!("Rendered report with {} field(s), {} bytes", fields.len(), bytes.len());

    Ok(ReportDownload {
        file_name: REPORT_FILE_NAME.to_string(),
        mime: REPORT_MIME.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_uses_default_download_name() {
        let download = export_report(&[
            ("url".to_string(), "https://example.com".to_string()),
            ("csrf_token".to_string(), "secret".to_string()),
        ])
        .unwrap();

        assert_eq!(download.file_name, "SEO_Report.pdf");
        assert_eq!(download.mime, "application/pdf");
        assert!(download.bytes.starts_with(b"%PDF-"));
        assert!(!String::from_utf8_lossy(&download.bytes).contains("secret"));
    }
}
