use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;
use tracing::{info, warn};

use super::format::is_listed_name;
use crate::error::AppError;

/// The directory the viewer is allowed to read from.
///
/// A name is readable only if it shows up in the current listing and its canonical
/// path sits strictly below the canonical root.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create data directory {}", dir.display()))?;
        let root = fs::canonicalize(&dir)
            .await
            .with_context(|| format!("canonicalize data directory {}", dir.display()))?;
        info!("data directory: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regular files with a supported extension, sorted by name.
    pub async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .with_context(|| format!("read data directory {}", self.root.display()))?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !is_listed_name(&name) {
                continue;
            }
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Map a requested name to a readable path, or `NotFound`.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, AppError> {
        let listing = self.list().await?;
        if !listing.iter().any(|f| f == name) {
            warn!(file = %name, "requested file is not in the data directory listing");
            return Err(AppError::NotFound);
        }

        let candidate = fs::canonicalize(self.root.join(name)).await.map_err(|e| {
            warn!(file = %name, error = %e, "canonicalize failed");
            AppError::NotFound
        })?;
        if candidate == self.root || !candidate.starts_with(&self.root) {
            warn!(file = %name, resolved = %candidate.display(), "path escapes the data directory");
            return Err(AppError::NotFound);
        }
        Ok(candidate)
    }
}
