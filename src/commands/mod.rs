//! Command boundary: every failure leaves here as a [`CommandError`](crate::error::CommandError).

pub mod fixed;
pub mod report;
pub mod scan;

pub use fixed::get_fixed_page;
pub use report::{export_report, ReportDownload};
pub use scan::{scan_site, ScanResponse};
