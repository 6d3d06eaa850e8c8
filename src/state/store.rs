//! Durable record of completed downloads.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::{read_json_list, write_json_atomic};
use crate::media::{AssetRecord, DownloadOutcome, DownloadResult};

/// One persisted download; same `{id, title, assetUrl}` shape as an asset.
pub type PersistedEntry = AssetRecord;

/// Completed downloads, keyed by asset URL, mirrored to a JSON file.
///
/// Every entry refers to a file that was fully written before it was
/// recorded. The asset URLs form the skip-set for later runs.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    entries: Vec<PersistedEntry>,
    keys: HashSet<String>,
}

impl StateStore {
    /// Load the state file. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        let stored: Vec<PersistedEntry> = read_json_list(path).map_err(|e| Error::Persistence {
            path: path.to_path_buf(),
            message: format!("cannot read state: {}", e),
        })?;

        let mut store = Self {
            path: path.to_path_buf(),
            entries: Vec::with_capacity(stored.len()),
            keys: HashSet::with_capacity(stored.len()),
        };

        for entry in stored {
            if store.keys.insert(entry.dedup_key().to_string()) {
                store.entries.push(entry);
            } else {
                tracing::debug!("Ignoring duplicate state entry for {}", entry.asset_url);
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PersistedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Asset URLs that were already downloaded.
    pub fn completed_keys(&self) -> &HashSet<String> {
        &self.keys
    }

    pub fn is_completed(&self, record: &AssetRecord) -> bool {
        self.keys.contains(record.dedup_key())
    }

    /// Record a successful download and rewrite the state file.
    ///
    /// Failures and already-recorded assets are ignored (`Ok(false)`). If the
    /// file cannot be written the in-memory state is left unchanged and a
    /// [`Error::Persistence`] is returned.
    pub fn record(&mut self, result: &DownloadResult) -> Result<bool> {
        if !matches!(result.outcome, DownloadOutcome::Success { .. }) {
            return Ok(false);
        }
        if self.is_completed(&result.record) {
            return Ok(false);
        }

        self.entries.push(result.record.clone());

        if let Err(e) = write_json_atomic(&self.path, &self.entries) {
            self.entries.pop();
            return Err(Error::Persistence {
                path: self.path.clone(),
                message: e.to_string(),
            });
        }

        self.keys.insert(result.record.dedup_key().to_string());
        Ok(true)
    }
}
