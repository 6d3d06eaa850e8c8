//! Catalog enumeration by probing numbered page URLs.

use std::ops::RangeInclusive;

use indicatif::ProgressBar;

use crate::api::SiteClient;
use crate::catalog::source::SourceDescriptor;

/// Build a catalog by requesting `{base_url}{id}` for every id in `ids`.
///
/// Only ids answering exactly HTTP 200 are kept. Other statuses and transport
/// errors skip that id with a warning. Ids are probed in order and the
/// catalog keeps that order.
pub async fn probe_catalog(
    client: &SiteClient,
    base_url: &str,
    ids: RangeInclusive<u64>,
    progress: &ProgressBar,
) -> Vec<SourceDescriptor> {
    let mut catalog = Vec::new();

    for id in ids {
        let url = format!("{}{}", base_url, id);

        match client.probe(&url).await {
            Ok(200) => catalog.push(SourceDescriptor::new(id, url)),
            Ok(status) => {
                tracing::warn!("URL {} returned status code {}. Skipping.", url, status);
            }
            Err(e) => {
                tracing::warn!("Error accessing {}: {}. Skipping.", url, e);
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    catalog
}
