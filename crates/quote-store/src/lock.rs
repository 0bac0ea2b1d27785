use crate::error::StoreError;
use crate::paths::QuotePaths;
use fs2::FileExt;
use std::fs::{File, OpenOptions};

/// Exclusive workspace lock backed by `.quote/LOCK`.
/// Released when dropped.
pub struct WorkspaceLock {
    _file: File,
}

impl WorkspaceLock {
    /// Try to acquire the workspace lock (non-blocking).
    pub fn acquire(paths: &QuotePaths) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&paths.lock_file)
            .map_err(|e| {
                anyhow::anyhow!("cannot open lock file {}: {}", paths.lock_file.display(), e)
            })?;

        file.try_lock_exclusive()
            .map_err(|_| StoreError::Locked(paths.lock_file.clone()))?;
        tracing::debug!(path = %paths.lock_file.display(), "workspace lock acquired");

        Ok(Self { _file: file })
    }
}
