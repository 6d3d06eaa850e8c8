//! Source catalog module.
//!
//! Provides:
//! - Loading and saving the page catalog
//! - Building a catalog by probing numbered page URLs

pub mod probe;
pub mod source;

pub use probe::probe_catalog;
pub use source::{load_catalog, save_catalog, SourceDescriptor};
