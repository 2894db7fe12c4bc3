//! Storage for corrected documents.
//!
//! Every save gets its own file name so concurrent scans never overwrite
//! each other's output.

use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct FixedPageStore {
    dir: PathBuf,
}

impl FixedPageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a corrected document and return where it landed.
    pub async fn save(&self, markup: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;

        let name = format!("fixed_{}.html", Uuid::new_v4().simple());
        let path = self.dir.join(&name);
        tokio::fs::write(&path, markup)
            .await
            .map_err(|e| AppError::storage(format!("failed to write {}: {}", path.display(), e)))?;

        log::info!("[FIX] Wrote corrected page to {}", path.display());
        Ok(path)
    }

    /// Map a bare file name onto the storage directory.
    /// Anything that is not a single plain file name is rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || name.starts_with('.') || name.contains('\\') {
            return Err(AppError::NotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Read back a previously generated document by file name.
    pub async fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => Ok(markup),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(name.to_string()))
            }
            Err(e) => Err(AppError::storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
