//! Filename generation and manipulation.

use crate::error::{Error, Result};

/// Title used when a page has no usable title.
pub const UNTITLED: &str = "Untitled";

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    // Also reject if it contains path separators (should be sanitized, not allowed)
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    // Sanitize remaining problematic characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Turn a page title into something safe to embed in a file name.
///
/// Unlike [`sanitize_filename`] this never fails: separators and reserved
/// characters become `_`, dot runs are collapsed, and an empty result falls
/// back to [`UNTITLED`].
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", ".");
    }

    let trimmed = sanitized.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the output file name for an asset: `{id}-{title}.{extension}`.
///
/// The same id and title always produce the same name, so a retry overwrites
/// the earlier attempt instead of creating a sibling.
pub fn media_file_name(id: u64, title: &str, extension: &str) -> Result<String> {
    let name = format!("{}-{}.{}", id, sanitize_title(title), extension);
    sanitize_filename(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("normal.txt").unwrap(), "normal.txt");
        assert_eq!(sanitize_filename("file:name.txt").unwrap(), "file_name.txt");
        assert_eq!(
            sanitize_filename("file*with?special.txt").unwrap(),
            "file_with_special.txt"
        );
    }

    #[test]
    fn test_sanitize_filename_path_traversal() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("..\\windows\\system32").is_err());
        assert!(sanitize_filename("foo/../bar").is_err());
    }

    #[test]
    fn test_sanitize_filename_rejects_separators_and_nul() {
        assert!(sanitize_filename("path/to/file.txt").is_err());
        assert!(sanitize_filename("file\0name.txt").is_err());
        assert!(sanitize_filename("   ").is_err());
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Lesson 12"), "Lesson 12");
        assert_eq!(sanitize_title("A/B: C?"), "A_B_ C_");
        assert_eq!(sanitize_title("Part 1...3"), "Part 1.3");
        assert_eq!(sanitize_title("../../etc"), "_._etc");
        assert_eq!(sanitize_title("  . "), UNTITLED);
        assert_eq!(sanitize_title(""), UNTITLED);
    }

    #[test]
    fn test_media_file_name() {
        assert_eq!(
            media_file_name(164, "Lesson 12", "mp4").unwrap(),
            "164-Lesson 12.mp4"
        );
        assert_eq!(
            media_file_name(3, "第三集 <b>", "mp4").unwrap(),
            "3-第三集 _b_.mp4"
        );
        assert_eq!(media_file_name(9, "", "mp4").unwrap(), "9-Untitled.mp4");
    }

    #[test]
    fn test_media_file_name_is_stable() {
        let first = media_file_name(42, "Intro", "mp4").unwrap();
        let second = media_file_name(42, "Intro", "mp4").unwrap();
        assert_eq!(first, second);
    }
}
