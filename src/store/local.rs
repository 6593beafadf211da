use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// String records keyed by name, one file per key under a root directory.
/// Every write replaces the whole record.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub async fn set(&self, key: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let path = self.record_path(key);
        // Each write stages into its own file so concurrent writers never share one.
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        let staging = self
            .root
            .join(format!(".{}.json.{}.{}.tmp", key, std::process::id(), seq));

        fs::write(&staging, contents)
            .await
            .with_context(|| format!("failed to write {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("failed to replace {}", path.display()))?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}
