use quote_core::catalog::{default_catalog, Catalog};
use quote_core::defaults::sample_quotation;
use quote_core::{QuoteEditor, TotalsConfig};
use std::path::Path;
use time::Date;

use crate::book::RecordBook;
use crate::catalog_file::{load_catalog, save_catalog};
use crate::config::WorkspaceConfig;
use crate::lock::WorkspaceLock;
use crate::paths::QuotePaths;
use crate::record::HistoryLog;

/// Everything under one `.quote/` directory, loaded.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub paths: QuotePaths,
    pub config: WorkspaceConfig,
    pub catalog: Catalog,
    pub book: RecordBook,
}

impl Workspace {
    /// Create `.quote/` under `root` with the default catalog and the sample
    /// quotation. Returns `false` when the workspace already existed; missing
    /// files are still filled in.
    pub fn init(root: &Path, today: Date) -> anyhow::Result<bool> {
        let paths = QuotePaths::discover(root);
        let existed = paths.is_initialized();
        paths.ensure_layout()?;
        let _lock = WorkspaceLock::acquire(&paths)?;

        if !paths.config_json.exists() {
            WorkspaceConfig::default().save(&paths.config_json)?;
        }
        if !paths.catalog_yaml.exists() {
            save_catalog(&paths.catalog_yaml, &default_catalog())?;
        }
        if !paths.quotations_json.exists() {
            let mut book = RecordBook::default();
            book.seed_sample(sample_quotation(today), &crate::now_rfc3339()?);
            book.save(&paths.quotations_json)?;
        }
        tracing::info!(root = %paths.root.display(), existed, "workspace initialized");
        Ok(!existed)
    }

    /// Open the workspace enclosing `start`.
    pub fn open(start: &Path) -> anyhow::Result<Self> {
        let paths = QuotePaths::resolve(start);
        paths.require_initialized()?;
        Ok(Self {
            config: WorkspaceConfig::load(&paths.config_json)?,
            catalog: load_catalog(&paths.catalog_yaml)?,
            book: RecordBook::load(&paths.quotations_json)?,
            paths,
        })
    }

    pub fn lock(&self) -> anyhow::Result<WorkspaceLock> {
        WorkspaceLock::acquire(&self.paths)
    }

    pub fn totals_config(&self) -> anyhow::Result<TotalsConfig> {
        Ok(self.config.totals_config()?)
    }

    /// Open a stored quotation in an editor configured for this workspace.
    pub fn editor(&self, key: &str) -> anyhow::Result<QuoteEditor> {
        let record = self.book.get(key)?;
        Ok(QuoteEditor::new(record.data.clone(), self.totals_config()?))
    }

    /// Save an edited quotation back into its record and persist the book.
    /// Returns the history entry the save produced, if any.
    pub fn commit(&mut self, key: &str, editor: QuoteEditor) -> anyhow::Result<Option<HistoryLog>> {
        let user = self.config.operator_name();
        let now = crate::now_rfc3339()?;
        let entry = self
            .book
            .commit(key, editor.into_quotation(), &user, &now)?
            .cloned();
        self.save_book()?;
        Ok(entry)
    }

    pub fn save_book(&self) -> anyhow::Result<()> {
        self.book.save(&self.paths.quotations_json)
    }

    pub fn save_config(&self) -> anyhow::Result<()> {
        self.config.save(&self.paths.config_json)
    }

    pub fn save_catalog(&self) -> anyhow::Result<()> {
        save_catalog(&self.paths.catalog_yaml, &self.catalog)
    }
}
