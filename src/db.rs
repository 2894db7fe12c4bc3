use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

use crate::config::AppConfig;

/// Configure SQLite pragmas for every new connection.
async fn configure_sqlite_pragmas(conn: &mut sqlx::SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Executor;

    // WAL lets readers proceed while the single writer appends
    conn.execute("PRAGMA journal_mode = WAL").await?;
    conn.execute("PRAGMA synchronous = NORMAL").await?;

    // 5 second timeout for busy connections (prevents "database locked" errors)
    conn.execute("PRAGMA busy_timeout = 5000").await?;

    Ok(())
}

/// Open (creating if needed) the history database and apply migrations.
pub async fn init_db(config: &AppConfig) -> Result<SqlitePool> {
    log::info!("Data directory: {}", config.data_dir.display());

    std::fs::create_dir_all(&config.data_dir).context(format!(
        "failed to create data dir: {}",
        config.data_dir.display()
    ))?;

    let db_path = config.database_path();
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    log::debug!("Database URL: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                configure_sqlite_pragmas(conn).await?;
                Ok(())
            })
        })
        .connect(&db_url)
        .await
        .context(format!(
            "failed to connect to database at {}",
            db_path.display()
        ))?;

    // Creates seo_results lazily on first start
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    log::info!("Database initialized at {}", db_path.display());

    Ok(pool)
}
