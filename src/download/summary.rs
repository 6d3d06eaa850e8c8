//! Run statistics.

use crate::media::{DownloadOutcome, DownloadResult, ExtractionReport};

/// A download that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub id: u64,
    pub title: String,
    pub reason: String,
}

/// Counters for one pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub catalog_size: usize,
    pub extracted: usize,
    pub from_cache: usize,
    pub extraction_misses: usize,
    pub extraction_failures: usize,
    pub already_downloaded: usize,
    /// Records whose asset was already queued from another page.
    pub duplicate_assets: usize,
    pub downloaded: usize,
    pub bytes_downloaded: u64,
    pub download_failures: Vec<FailedDownload>,
}

impl RunSummary {
    pub fn new(catalog_size: usize) -> Self {
        Self {
            catalog_size,
            ..Default::default()
        }
    }

    /// Take the counts of an extraction pass.
    pub fn add_extraction(&mut self, report: &ExtractionReport) {
        self.extracted = report.records.len();
        self.from_cache = report.from_cache;
        self.extraction_misses = report.misses.len();
        self.extraction_failures = report.failures.len();
    }

    /// Count one download result.
    pub fn add_result(&mut self, result: &DownloadResult) {
        match &result.outcome {
            DownloadOutcome::Success { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            DownloadOutcome::Failure { reason } => {
                self.download_failures.push(FailedDownload {
                    id: result.record.id,
                    title: result.record.title.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Downloads completed in this run.
    pub fn successes(&self) -> usize {
        self.downloaded
    }

    /// Pages that could not be fetched plus downloads that failed.
    pub fn failures(&self) -> usize {
        self.extraction_failures + self.download_failures.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failures() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::AssetRecord;
    use std::path::PathBuf;

    #[test]
    fn test_counts() {
        let mut summary = RunSummary::new(3);
        let record = AssetRecord::new(1, "a", "https://cdn.example.com/a.mp4");

        summary.add_result(&DownloadResult::success(record.clone(), PathBuf::from("a"), 100));
        summary.add_result(&DownloadResult::success(record.clone(), PathBuf::from("b"), 50));
        summary.add_result(&DownloadResult::failure(record, "HTTP 503"));
        summary.extraction_failures = 1;

        assert_eq!(summary.successes(), 2);
        assert_eq!(summary.bytes_downloaded, 150);
        assert_eq!(summary.failures(), 2);
        assert!(summary.has_failures());
        assert_eq!(summary.download_failures[0].reason, "HTTP 503");
    }

    #[test]
    fn test_add_extraction() {
        let report = ExtractionReport {
            records: vec![AssetRecord::new(1, "a", "https://cdn.example.com/a.mp4")],
            from_cache: 1,
            misses: vec![2],
            failures: vec![(3, "HTTP 500".into())],
        };
        let mut summary = RunSummary::new(3);
        summary.add_extraction(&report);

        assert_eq!(summary.extracted, 1);
        assert_eq!(summary.extraction_misses, 1);
        assert_eq!(summary.extraction_failures, 1);
        assert!(summary.has_failures());
    }
}
