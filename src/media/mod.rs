//! Media discovery module.

pub mod cache;
pub mod extractor;
pub mod item;
pub mod parser;

pub use cache::ExtractionCache;
pub use extractor::{ExtractionReport, PageExtractor};
pub use item::{AssetRecord, DownloadOutcome, DownloadResult};
pub use parser::{clean_title, ExtractedMedia, ExtractionRule, VideoTagRule};
