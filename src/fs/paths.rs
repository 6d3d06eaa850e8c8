//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::media_file_name;
use crate::media::AssetRecord;

/// Suffix of a download that has not finished yet.
pub const PART_SUFFIX: &str = ".part";

/// Get the final path of a downloaded asset.
pub fn get_download_path(
    output_dir: &Path,
    record: &AssetRecord,
    extension: &str,
) -> Result<PathBuf> {
    let name = media_file_name(record.id, &record.title, extension)?;
    Ok(output_dir.join(name))
}

/// Path an in-progress download is streamed to (`video.mp4` -> `video.mp4.part`).
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_owned();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
