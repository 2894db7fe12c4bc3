//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "seo_data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DATABASE_FILE: &str = "seo_data.db";
const FIXED_PAGES_DIR: &str = "fixed_pages";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory holding the history database and generated documents.
    pub data_dir: PathBuf,
    /// Bounded wait for a single page retrieval.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn fixed_pages_dir(&self) -> PathBuf {
        self.data_dir.join(FIXED_PAGES_DIR)
    }

    /// Apply overrides from the command line (or their environment fallbacks).
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        timeout_secs: Option<u64>,
        user_agent: Option<String>,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = user_agent.filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }
        self
    }
}
