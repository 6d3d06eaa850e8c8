//! HTTP access to the source site.
//!
//! This module provides:
//! - A shared HTTP client with a browser user agent
//! - Timeouts on every request
//! - Status checking for page fetches and downloads

pub mod client;

pub use client::SiteClient;
