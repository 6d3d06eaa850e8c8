//! End-to-end run: catalog, extraction, skip-set filtering, downloads.

use std::collections::HashSet;
use std::sync::Arc;

use crate::api::SiteClient;
use crate::catalog::load_catalog;
use crate::config::Config;
use crate::download::{HttpDownloader, RunSummary, Scheduler};
use crate::error::Result;
use crate::fs::ensure_dir;
use crate::media::{AssetRecord, ExtractionCache, PageExtractor, VideoTagRule};
use crate::output::Progress;
use crate::state::{PersistenceWriter, StateStore};

/// One configured run of the downloader.
pub struct Pipeline {
    config: Config,
    client: SiteClient,
    progress: Progress,
}

impl Pipeline {
    pub fn new(config: Config, progress: Progress) -> Result<Self> {
        let client = SiteClient::from_config(&config)?;
        tracing::debug!("Using user agent {}", client.user_agent());
        Ok(Self {
            config,
            client,
            progress,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the run.
    ///
    /// Per-page and per-download failures are counted in the summary. Only
    /// configuration and persistence errors are returned as `Err`.
    pub async fn run(&self) -> Result<RunSummary> {
        let paths = &self.config.paths;
        let options = &self.config.options;

        let catalog = load_catalog(&paths.catalog)?;
        let store = StateStore::load(&paths.state)?;
        let mut summary = RunSummary::new(catalog.len());

        tracing::info!(
            "Loaded {} page(s) from catalog, {} already downloaded",
            catalog.len(),
            store.len()
        );

        let mut cache = if options.refresh_cache {
            tracing::info!("Ignoring extraction cache {}", paths.extracted_cache.display());
            ExtractionCache::empty(&paths.extracted_cache)
        } else {
            ExtractionCache::load(&paths.extracted_cache).unwrap_or_else(|e| {
                tracing::warn!(
                    "Could not read extraction cache {}: {}. Re-extracting.",
                    paths.extracted_cache.display(),
                    e
                );
                ExtractionCache::empty(&paths.extracted_cache)
            })
        };

        let extractor = PageExtractor::new(
            self.client.clone(),
            VideoTagRule::new(&options.media_extension),
        )
        .with_concurrency(options.extract_concurrency)
        .with_delay(
            self.config.network.request_delay_min_ms,
            self.config.network.request_delay_max_ms,
        );

        let bar = self.progress.item_bar(catalog.len() as u64, "Pages");
        let report = extractor.extract_cached(&catalog, &mut cache, &bar).await;
        bar.finish_and_clear();
        summary.add_extraction(&report);

        let pending = self.pending(report.records, &store, &mut summary);
        if pending.is_empty() {
            tracing::info!("Nothing new to download");
            return Ok(summary);
        }

        ensure_dir(&paths.output_directory).await?;

        let downloader = HttpDownloader::new(
            self.client.clone(),
            self.config.read_timeout(),
            self.progress.clone(),
        );
        let overall = self.progress.item_bar(pending.len() as u64, "Downloads");
        let scheduler = Scheduler::new(
            Arc::new(downloader),
            options.max_concurrency,
            paths.output_directory.clone(),
            options.media_extension.clone(),
        )
        .with_progress(overall.clone());

        let mut writer = PersistenceWriter::new(store);
        let results = scheduler.run(pending, &mut writer).await;
        overall.finish_and_clear();

        for result in results?.iter() {
            summary.add_result(result);
        }

        tracing::debug!("Recorded {} new state entries", writer.recorded());
        Ok(summary)
    }

    /// Drop records whose asset is already downloaded or queued.
    fn pending(
        &self,
        records: Vec<AssetRecord>,
        store: &StateStore,
        summary: &mut RunSummary,
    ) -> Vec<AssetRecord> {
        let mut queued = HashSet::new();
        let mut pending = Vec::with_capacity(records.len());

        for record in records {
            if store.is_completed(&record) {
                summary.already_downloaded += 1;
                if self.config.options.show_skipped_downloads {
                    tracing::info!("Skipping {} {} (already downloaded)", record.id, record.title);
                }
                continue;
            }
            if !queued.insert(record.dedup_key().to_string()) {
                summary.duplicate_assets += 1;
                tracing::debug!("Asset {} appears on more than one page", record.asset_url);
                continue;
            }
            pending.push(record);
        }

        pending
    }
}

/// Build a [`Pipeline`] from `config` and run it.
pub async fn run_pipeline(config: Config, progress: Progress) -> Result<RunSummary> {
    Pipeline::new(config, progress)?.run().await
}
