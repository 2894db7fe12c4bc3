pub mod analyzer;
pub mod auto_fixer;
pub mod fixed_pages;
pub mod http;
pub mod platform;
pub mod report;
pub mod scan;

pub use analyzer::analyze;
pub use auto_fixer::{fix_markup, fix_page, FixOutcome};
pub use fixed_pages::FixedPageStore;
pub use http::{Fetcher, Transport};
pub use platform::detect_platform;
pub use report::render_report;
pub use scan::{validate_url, ScanRequest, ScanService};
