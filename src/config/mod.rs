//! Configuration module for the page-video-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation
//!
//! CLI overrides are merged in by [`crate::cli::Args::merge_into_config`].

pub mod loader;
pub mod validation;

pub use loader::{Config, NetworkConfig, OptionsConfig, PathsConfig};
pub use validation::{validate_config, MAX_CONCURRENCY};
