use quote_core::defaults::today_utc;
use quote_store::{QuotePaths, Workspace};
use std::path::Path;

pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let paths = QuotePaths::discover(repo_root);
    if Workspace::init(repo_root, today_utc())? {
        println!("Initialized {}", paths.quote_dir.display());
        println!("  sample quotation: {}", quote_store::book::SAMPLE_ID);
    } else {
        println!("Already initialized at {}", paths.quote_dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        execute(tmp.path()).unwrap();
        execute(tmp.path()).unwrap();
        let paths = QuotePaths::discover(tmp.path());
        assert!(paths.quotations_json.is_file());
        assert!(paths.catalog_yaml.is_file());
        assert!(paths.config_json.is_file());
    }
}
