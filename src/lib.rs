//! Page Video Downloader - extract and download videos embedded in web pages
//!
//! This library turns a catalog of page URLs into downloaded media files.
//!
//! # Features
//!
//! - Find the first `<video>` asset on each page, with a per-page cache
//! - Bounded-concurrency streaming downloads
//! - Crash-safe JSON state, written after every completed file
//! - Resume by skipping assets that are already recorded
//! - Catalog enumeration by probing numbered page URLs
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use page_video_downloader::{run_pipeline, Config, Progress};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let summary = run_pipeline(config, Progress::new(true)).await?;
//!     println!("{} downloaded, {} failed", summary.successes(), summary.failures());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod state;

// Re-exports for convenience
pub use api::SiteClient;
pub use catalog::{load_catalog, probe_catalog, save_catalog, SourceDescriptor};
pub use config::Config;
pub use download::{AssetDownloader, HttpDownloader, RunSummary, Scheduler};
pub use error::{Error, Result};
pub use media::{AssetRecord, DownloadOutcome, DownloadResult, PageExtractor};
pub use output::Progress;
pub use pipeline::{run_pipeline, Pipeline};
pub use state::{PersistenceWriter, StateStore};
