//! Download module for asset transfers.
//!
//! This module provides:
//! - Streaming HTTP downloads into `.part` files
//! - A fixed worker pool bounded by the configured concurrency
//! - Run statistics

pub mod media;
pub mod scheduler;
pub mod summary;

pub use media::{AssetDownloader, HttpDownloader};
pub use scheduler::Scheduler;
pub use summary::{FailedDownload, RunSummary};
