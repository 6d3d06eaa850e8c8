//! Single-writer aggregation of download results.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::media::{DownloadOutcome, DownloadResult};
use crate::state::store::StateStore;

/// Sole owner of the [`StateStore`] while downloads run.
///
/// Workers send their results over a channel; this type drains it and records
/// every success before looking at the next result, so concurrent
/// read-modify-write cycles on the state file cannot interleave.
#[derive(Debug)]
pub struct PersistenceWriter {
    store: StateStore,
    recorded: usize,
}

impl PersistenceWriter {
    pub fn new(store: StateStore) -> Self {
        Self { store, recorded: 0 }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Number of entries added through this writer.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Persist one result if it is a success.
    pub fn append(&mut self, result: &DownloadResult) -> Result<bool> {
        let added = self.store.record(result)?;
        if added {
            self.recorded += 1;
            tracing::debug!(
                "Updated '{}' with {}",
                self.store.path().display(),
                result.record.title
            );
        }
        Ok(added)
    }

    /// Receive results until every sender is gone.
    ///
    /// `on_result` sees each result after it was persisted. Returns the
    /// results in completion order, or the first persistence error, in which
    /// case the receiver is dropped and remaining senders start failing.
    pub async fn drain<F>(
        &mut self,
        mut results: mpsc::Receiver<DownloadResult>,
        mut on_result: F,
    ) -> Result<Vec<DownloadResult>>
    where
        F: FnMut(&DownloadResult),
    {
        let mut collected = Vec::new();

        while let Some(result) = results.recv().await {
            if let DownloadOutcome::Failure { reason } = &result.outcome {
                tracing::debug!("Not recording failed download {}: {}", result.record.id, reason);
            }
            self.append(&result)?;
            on_result(&result);
            collected.push(result);
        }

        Ok(collected)
    }
}
