//! Page fetching and asset extraction.

use std::ops::RangeInclusive;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use rand::Rng;
use tokio::time::sleep;
use url::Url;

use crate::api::SiteClient;
use crate::catalog::SourceDescriptor;
use crate::error::Result;
use crate::media::cache::ExtractionCache;
use crate::media::item::AssetRecord;
use crate::media::parser::{ExtractionRule, VideoTagRule};

/// Outcome of extracting a batch of pages.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Assets found, in catalog order.
    pub records: Vec<AssetRecord>,
    /// How many of `records` came from the cache without a fetch.
    pub from_cache: usize,
    /// Pages fetched fine but without a qualifying video.
    pub misses: Vec<u64>,
    /// Pages that could not be fetched, with the reason.
    pub failures: Vec<(u64, String)>,
}

enum PageOutcome {
    Found(AssetRecord),
    Miss,
    Failed(String),
}

/// Turns source pages into [`AssetRecord`]s.
pub struct PageExtractor<R = VideoTagRule> {
    client: SiteClient,
    rule: R,
    concurrency: usize,
    delay_ms: RangeInclusive<u64>,
}

impl<R: ExtractionRule> PageExtractor<R> {
    pub fn new(client: SiteClient, rule: R) -> Self {
        Self {
            client,
            rule,
            concurrency: 1,
            delay_ms: 0..=0,
        }
    }

    /// Fetch up to `concurrency` pages at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Wait a random `min..=max` milliseconds before each page fetch.
    pub fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay_ms = min_ms..=max_ms.max(min_ms);
        self
    }

    /// Extract the asset of one page.
    ///
    /// `Ok(None)` means the page loaded but holds no qualifying video.
    pub async fn extract(&self, source: &SourceDescriptor) -> Result<Option<AssetRecord>> {
        if *self.delay_ms.end() > 0 {
            let delay_ms = rand::thread_rng().gen_range(self.delay_ms.clone());
            sleep(Duration::from_millis(delay_ms)).await;
        }

        let page_url = Url::parse(&source.url)?;
        let html = self.client.get_page(&source.url).await?;

        Ok(self
            .rule
            .extract(&html, &page_url)
            .map(|media| AssetRecord::new(source.id, media.title, media.media_url)))
    }

    /// Extract every page, never letting one failure stop the batch.
    pub async fn extract_all(
        &self,
        sources: &[SourceDescriptor],
        progress: &ProgressBar,
    ) -> ExtractionReport {
        let mut outcomes: Vec<(usize, u64, PageOutcome)> = stream::iter(sources.iter().enumerate())
            .map(|(i, source)| async move {
                let outcome = match self.extract(source).await {
                    Ok(Some(record)) => PageOutcome::Found(record),
                    Ok(None) => {
                        tracing::debug!("No video found on {}", source.url);
                        PageOutcome::Miss
                    }
                    Err(e) => {
                        tracing::warn!("Error fetching {}: {}", source.url, e);
                        PageOutcome::Failed(e.to_string())
                    }
                };
                progress.inc(1);
                (i, source.id, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; report in catalog order.
        outcomes.sort_by_key(|(i, _, _)| *i);

        let mut report = ExtractionReport::default();
        for (_, id, outcome) in outcomes {
            match outcome {
                PageOutcome::Found(record) => report.records.push(record),
                PageOutcome::Miss => report.misses.push(id),
                PageOutcome::Failed(reason) => report.failures.push((id, reason)),
            }
        }

        report
    }

    /// Like [`extract_all`](Self::extract_all), but pages already in `cache`
    /// are reused instead of fetched, and new finds are written back to it.
    pub async fn extract_cached(
        &self,
        sources: &[SourceDescriptor],
        cache: &mut ExtractionCache,
        progress: &ProgressBar,
    ) -> ExtractionReport {
        let reusable = |id: u64, cache: &ExtractionCache| {
            cache
                .get(id)
                .is_some_and(|record| self.rule.accepts(&record.asset_url))
        };

        let pending: Vec<SourceDescriptor> = sources
            .iter()
            .filter(|s| !reusable(s.id, &*cache))
            .cloned()
            .collect();
        let cached = sources.len() - pending.len();

        let stale = pending.iter().filter(|s| cache.get(s.id).is_some()).count();
        if stale > 0 {
            tracing::warn!(
                "{} cached record(s) do not match the media extension; fetching those pages again",
                stale
            );
        }
        if cached > 0 {
            tracing::info!("Reusing {} cached extraction result(s)", cached);
        }
        progress.inc(cached as u64);

        let mut report = self.extract_all(&pending, progress).await;

        if !report.records.is_empty() {
            let added = cache.merge(report.records.drain(..));
            if let Err(e) = cache.save() {
                tracing::warn!("Could not update extraction cache: {}", e);
            } else {
                tracing::debug!("Added {} record(s) to extraction cache", added);
            }
        }

        report.records = sources
            .iter()
            .filter(|s| reusable(s.id, &*cache))
            .filter_map(|s| cache.get(s.id).cloned())
            .collect();
        report.from_cache = cached;
        report
    }
}
