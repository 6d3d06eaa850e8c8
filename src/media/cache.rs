//! On-disk cache of extraction results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::{read_json_list, write_json_atomic};
use crate::media::item::AssetRecord;

/// Extracted assets keyed by source id, backed by a JSON list file.
///
/// Pages already present here are not fetched again on later runs.
#[derive(Debug)]
pub struct ExtractionCache {
    path: PathBuf,
    records: Vec<AssetRecord>,
    index: HashMap<u64, usize>,
}

impl ExtractionCache {
    /// Load the cache file; a missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        let records: Vec<AssetRecord> = read_json_list(path)?;
        Ok(Self::from_records(path, records))
    }

    /// An empty cache that will overwrite `path` when saved.
    pub fn empty(path: &Path) -> Self {
        Self::from_records(path, Vec::new())
    }

    fn from_records(path: &Path, records: Vec<AssetRecord>) -> Self {
        let mut cache = Self {
            path: path.to_path_buf(),
            records: Vec::with_capacity(records.len()),
            index: HashMap::new(),
        };
        cache.merge(records);
        cache
    }

    pub fn get(&self, id: u64) -> Option<&AssetRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace records by id. Returns how many were new.
    pub fn merge(&mut self, records: impl IntoIterator<Item = AssetRecord>) -> usize {
        let mut added = 0;
        for record in records {
            match self.index.get(&record.id) {
                Some(&i) => self.records[i] = record,
                None => {
                    self.index.insert(record.id, self.records.len());
                    self.records.push(record);
                    added += 1;
                }
            }
        }
        added
    }

    /// Write the cache back atomically.
    pub fn save(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> AssetRecord {
        AssetRecord::new(id, format!("Lesson {}", id), format!("https://cdn.example.com/{}.mp4", id))
    }

    #[test]
    fn test_missing_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtractionCache::load(&dir.path().join("cache.json")).unwrap();
        assert!(cache.is_empty());
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_merge_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ExtractionCache::empty(&dir.path().join("cache.json"));

        assert_eq!(cache.merge([record(1), record(2)]), 2);
        let mut changed = record(1);
        changed.title = "Renamed".into();
        assert_eq!(cache.merge([changed, record(3)]), 1);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(1).unwrap().title, "Renamed");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = ExtractionCache::empty(&path);
        cache.merge([record(5), record(4)]);
        cache.save().unwrap();

        let reloaded = ExtractionCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(4), Some(&record(4)));
    }

    #[test]
    fn test_empty_ignores_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = ExtractionCache::empty(&path);
        cache.merge([record(1)]);
        cache.save().unwrap();

        let fresh = ExtractionCache::empty(&path);
        assert!(fresh.get(1).is_none());
    }
}
