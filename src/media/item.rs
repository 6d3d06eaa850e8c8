//! Asset and download result representation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A video found on a source page, ready to be downloaded.
///
/// Serialized as `{id, title, assetUrl}`; files written by older versions of
/// the tool used `id_7ree` and `video_url`, which are still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Id of the source page this asset came from.
    #[serde(alias = "id_7ree")]
    pub id: u64,

    /// Cleaned page title.
    pub title: String,

    /// Direct URL of the media file.
    #[serde(rename = "assetUrl", alias = "video_url")]
    pub asset_url: String,
}

impl AssetRecord {
    pub fn new(id: u64, title: impl Into<String>, asset_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            asset_url: asset_url.into(),
        }
    }

    /// Key used to decide whether this asset was already downloaded.
    pub fn dedup_key(&self) -> &str {
        &self.asset_url
    }
}

/// How a single download ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was fully written and moved into place.
    Success { path: PathBuf, bytes: u64 },
    /// The download failed; nothing was recorded.
    Failure { reason: String },
}

/// Result of running one [`AssetRecord`] through the downloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub record: AssetRecord,
    pub outcome: DownloadOutcome,
}

impl DownloadResult {
    pub fn success(record: AssetRecord, path: PathBuf, bytes: u64) -> Self {
        Self {
            record,
            outcome: DownloadOutcome::Success { path, bytes },
        }
    }

    pub fn failure(record: AssetRecord, reason: impl Into<String>) -> Self {
        Self {
            record,
            outcome: DownloadOutcome::Failure {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DownloadOutcome::Success { .. })
    }
}
