pub mod book;
pub mod catalog_file;
pub mod config;
pub mod error;
pub mod history;
pub mod lock;
pub mod paths;
pub mod record;
pub mod workspace;

pub use book::RecordBook;
pub use config::WorkspaceConfig;
pub use error::StoreError;
pub use lock::WorkspaceLock;
pub use paths::QuotePaths;
pub use record::{HistoryLog, QuotationRecord};
pub use workspace::Workspace;

use std::fs;
use std::io::Write;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Current UTC time as RFC 3339.
pub fn now_rfc3339() -> anyhow::Result<String> {
    Ok(time::OffsetDateTime::now_utc().format(&Rfc3339)?)
}
