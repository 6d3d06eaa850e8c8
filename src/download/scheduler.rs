//! Bounded-concurrency download scheduling.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::download::media::AssetDownloader;
use crate::error::Result;
use crate::fs::get_download_path;
use crate::media::{AssetRecord, DownloadResult};
use crate::state::PersistenceWriter;

/// Runs downloads on a fixed pool of workers.
///
/// Workers pull records from a shared queue, so at most `max_concurrency`
/// transfers are in flight. Results go to a single [`PersistenceWriter`].
pub struct Scheduler {
    downloader: Arc<dyn AssetDownloader>,
    max_concurrency: usize,
    output_dir: PathBuf,
    extension: String,
    overall: ProgressBar,
}

impl Scheduler {
    pub fn new(
        downloader: Arc<dyn AssetDownloader>,
        max_concurrency: usize,
        output_dir: PathBuf,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            downloader,
            max_concurrency: max_concurrency.max(1),
            output_dir,
            extension: extension.into(),
            overall: ProgressBar::hidden(),
        }
    }

    /// Advance `bar` by one for every finished download.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.overall = bar;
        self
    }

    /// Download every record, persisting each success as it completes.
    ///
    /// Individual failures are returned as results. Only a persistence error
    /// aborts the run, in which case outstanding workers are cancelled.
    pub async fn run(
        &self,
        records: Vec<AssetRecord>,
        writer: &mut PersistenceWriter,
    ) -> Result<Vec<DownloadResult>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.max_concurrency.min(records.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(records)));
        let (tx, rx) = mpsc::channel::<DownloadResult>(workers * 2);

        tracing::debug!("Starting {} download workers", workers);

        let mut tasks = JoinSet::new();
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let downloader = Arc::clone(&self.downloader);
            let output_dir = self.output_dir.clone();
            let extension = self.extension.clone();

            tasks.spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(record) = next else { break };

                    let result =
                        download_one(downloader.as_ref(), &output_dir, &extension, record).await;

                    if tx.send(result).await.is_err() {
                        tracing::debug!("Worker {} stopping: result channel closed", worker);
                        break;
                    }
                }
            });
        }
        drop(tx);

        let overall = self.overall.clone();
        let drained = writer
            .drain(rx, |result| {
                overall.inc(1);
                if result.is_success() {
                    tracing::info!("Downloaded {} {}", result.record.id, result.record.title);
                }
            })
            .await;

        if drained.is_err() {
            tasks.abort_all();
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                if !e.is_cancelled() {
                    tracing::error!("Download worker panicked: {}", e);
                }
            }
        }

        drained
    }
}

async fn download_one(
    downloader: &dyn AssetDownloader,
    output_dir: &std::path::Path,
    extension: &str,
    record: AssetRecord,
) -> DownloadResult {
    let destination = match get_download_path(output_dir, &record, extension) {
        Ok(path) => path,
        Err(e) => return DownloadResult::failure(record, e.to_string()),
    };

    tracing::debug!("Downloading {} -> {}", record.asset_url, destination.display());

    match downloader.download(&record.asset_url, &destination).await {
        Ok(bytes) => DownloadResult::success(record, destination, bytes),
        Err(e) => {
            tracing::warn!("Failed to download {} {}: {}", record.id, record.title, e);
            DownloadResult::failure(record, e.to_string())
        }
    }
}
