use anyhow::Context;
use quote_core::catalog::{default_catalog, Catalog};
use std::path::Path;

/// Read `catalog.yaml`. A missing file yields the built-in catalog.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    if !path.exists() {
        return Ok(default_catalog());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog: {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("parsing catalog: {}", path.display()))
}

pub fn save_catalog(path: &Path, catalog: &Catalog) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(catalog)?;
    crate::write_atomic(path, yaml.as_bytes())
        .with_context(|| format!("saving catalog: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_default() {
        let tmp = tempfile::tempdir().unwrap();
        let cat = load_catalog(&tmp.path().join("catalog.yaml")).unwrap();
        assert_eq!(cat, default_catalog());
    }

    #[test]
    fn edits_survive_save() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.yaml");
        let mut cat = default_catalog();
        cat.ensure_skill("Makeup Artist");
        save_catalog(&path, &cat).unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.skills.len(), 8);
        assert_eq!(loaded, cat);
    }

    #[test]
    fn hand_written_yaml_with_sparse_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.yaml");
        std::fs::write(
            &path,
            "skills:\n  - id: s1\n    name: Candid Photographer\ntemplates:\n  - id: t1\n    name: Mehendi\n    default_cost: oops\n",
        )
        .unwrap();
        let cat = load_catalog(&path).unwrap();
        assert!(cat.clients.is_empty());
        assert_eq!(cat.templates[0].default_cost, rust_decimal::Decimal::ZERO);
    }
}
