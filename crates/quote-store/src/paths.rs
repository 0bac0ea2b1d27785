use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// All well-known paths under `.quote/`.
#[derive(Debug, Clone)]
pub struct QuotePaths {
    pub root: PathBuf,
    pub quote_dir: PathBuf,
    pub quotations_json: PathBuf,
    pub config_json: PathBuf,
    pub catalog_yaml: PathBuf,
    pub lock_file: PathBuf,
}

impl QuotePaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let quote_dir = root.join(".quote");
        Self {
            quotations_json: quote_dir.join("quotations.json"),
            config_json: quote_dir.join("config.json"),
            catalog_yaml: quote_dir.join("catalog.yaml"),
            lock_file: quote_dir.join("LOCK"),
            quote_dir,
            root,
        }
    }

    /// Walk up from `start` looking for a directory containing `.quote/`.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut cur = start.to_path_buf();
        loop {
            if cur.join(".quote").is_dir() {
                return Some(cur);
            }
            if !cur.pop() {
                return None;
            }
        }
    }

    /// Discover from the nearest ancestor holding `.quote/`, falling back
    /// to `start` itself.
    pub fn resolve(start: &Path) -> Self {
        Self::discover(Self::find_root(start).unwrap_or_else(|| start.to_path_buf()))
    }

    /// Create the `.quote/` directory. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.quote_dir)?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.quote_dir.is_dir()
    }

    pub fn require_initialized(&self) -> Result<(), StoreError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized(self.root.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_builds_correct_paths() {
        let p = QuotePaths::discover("/tmp/studio");
        assert_eq!(p.quote_dir, PathBuf::from("/tmp/studio/.quote"));
        assert_eq!(
            p.quotations_json,
            PathBuf::from("/tmp/studio/.quote/quotations.json")
        );
        assert_eq!(p.catalog_yaml, PathBuf::from("/tmp/studio/.quote/catalog.yaml"));
        assert_eq!(p.lock_file, PathBuf::from("/tmp/studio/.quote/LOCK"));
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let p = QuotePaths::discover(tmp.path());
        p.ensure_layout().unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(QuotePaths::find_root(&nested).as_deref(), Some(tmp.path()));
        assert_eq!(QuotePaths::resolve(&nested).root, tmp.path());
    }

    #[test]
    fn ensure_layout_creates_empty_quote_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let p = QuotePaths::discover(tmp.path());
        p.ensure_layout().unwrap();
        p.ensure_layout().unwrap();
        assert!(p.is_initialized());
        assert_eq!(std::fs::read_dir(&p.quote_dir).unwrap().count(), 0);
    }

    #[test]
    fn uninitialized_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = QuotePaths::discover(tmp.path());
        assert!(!p.is_initialized());
        assert!(matches!(
            p.require_initialized(),
            Err(StoreError::NotInitialized(_))
        ));
    }
}
