//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename generation and manipulation
//! - Atomic JSON list files

pub mod json;
pub mod naming;
pub mod paths;

pub use json::{read_json_list, write_json_atomic};
pub use naming::{media_file_name, sanitize_filename, sanitize_title, UNTITLED};
pub use paths::{ensure_dir, get_download_path, part_path};
