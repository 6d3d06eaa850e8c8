//! Error types for the page-video-downloader application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Network errors
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Timed out: {0}")]
    Timeout(String),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // State file errors
    #[error("Failed to persist {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error must stop the whole run.
    ///
    /// Only state-file failures qualify; everything else is scoped to one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}
