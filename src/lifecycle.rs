//! Process lifecycle: logging and shared state.

use anyhow::Result;

use crate::config::AppConfig;
use crate::db;
use crate::repository::HistoryRepository;
use crate::service::{Fetcher, FixedPageStore, ScanService};

/// Everything a command needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub scan: ScanService,
    pub fixed_pages: FixedPageStore,
}

/// Initialize logging with tracing_subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sqlx=warn".parse().unwrap())
                .add_directive("seo_auditor=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Open the history store, build the HTTP client and wire the scan pipeline.
pub async fn setup(config: &AppConfig) -> Result<AppState> {
    let pool = db::init_db(config).await?;
    let fetcher = Fetcher::from_config(config)?;
    let fixed_pages = FixedPageStore::new(config.fixed_pages_dir());

    log::debug!(
        "Fetch timeout {:?}, fixed pages in {}",
        config.timeout,
        fixed_pages.dir().display()
    );

    Ok(AppState {
        scan: ScanService::new(fetcher, HistoryRepository::new(pool), fixed_pages.clone()),
        fixed_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn setup_creates_database_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_overrides(Some(dir.path().to_path_buf()), None, None);

        let state = setup(&config).await.unwrap();

        assert!(config.database_path().exists());
        assert_eq!(state.fixed_pages.dir(), config.fixed_pages_dir().as_path());
    }
}
