//! Source catalog: the list of pages to visit.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::{read_json_list, write_json_atomic};

/// One page to extract a video from. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub url: String,

    #[serde(alias = "id_7ree")]
    pub id: u64,
}

impl SourceDescriptor {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id,
        }
    }
}

/// Load the catalog from a JSON file.
///
/// A missing file is an error here: without a catalog there is nothing to do.
/// Entries repeating an earlier id are dropped with a warning.
pub fn load_catalog(path: &Path) -> Result<Vec<SourceDescriptor>> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Source catalog not found: {}. Create it with the `probe` command",
            path.display()
        )));
    }

    let entries: Vec<SourceDescriptor> = read_json_list(path)?;
    let mut seen = HashSet::new();
    let mut catalog = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.id) {
            catalog.push(entry);
        } else {
            tracing::warn!("Duplicate catalog id {} ({}), ignoring", entry.id, entry.url);
        }
    }

    Ok(catalog)
}

/// Write the catalog, replacing any previous file.
pub fn save_catalog(path: &Path, catalog: &[SourceDescriptor]) -> Result<()> {
    write_json_atomic(path, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_catalog_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_catalog(&dir.path().join("catalog.json")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_legacy_key_and_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"url": "https://example.com/p?id_7ree=143", "id_7ree": 143},
                {"url": "https://example.com/p?id_7ree=144", "id": 144},
                {"url": "https://example.com/p?again", "id": 143}
            ]"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(
            catalog,
            vec![
                SourceDescriptor::new(143, "https://example.com/p?id_7ree=143"),
                SourceDescriptor::new(144, "https://example.com/p?id_7ree=144"),
            ]
        );
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = vec![
            SourceDescriptor::new(9, "https://example.com/9"),
            SourceDescriptor::new(2, "https://example.com/2"),
        ];

        save_catalog(&path, &catalog).unwrap();
        assert_eq!(load_catalog(&path).unwrap(), catalog);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"url\": \"https://example.com/9\""));
    }
}
