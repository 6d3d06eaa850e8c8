//! Pretty-printed JSON list files with atomic replacement.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// Indentation used for every JSON file the tool writes.
const INDENT: &[u8] = b"    ";

/// Read a JSON array from `path`.
///
/// A missing file is an empty list, not an error.
pub fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Serialize `items` with four-space indentation.
pub fn to_pretty_json<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    items.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replace `path` with the JSON rendering of `items`.
///
/// The data goes to a uniquely named sibling file which is synced and then
/// renamed over `path`, so readers see either the old or the new list.
pub fn write_json_atomic<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let bytes = to_pretty_json(items)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path);
    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::Io(e));
    }

    Ok(())
}

/// `state.json` -> `state.json.<uuid>.tmp`, in the same directory.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        name: String,
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<Row> = read_json_list(&dir.path().join("nope.json")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_uses_four_space_indent_and_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let rows = vec![Row {
            id: 7,
            name: "第一课".into(),
        }];

        write_json_atomic(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    {\n        \"id\": 7,"));
        assert!(text.contains("第一课"));
        assert_eq!(read_json_list::<Row>(&path).unwrap(), rows);
    }

    #[test]
    fn test_write_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");

        write_json_atomic(&path, &[Row { id: 1, name: "a".into() }]).unwrap();
        write_json_atomic(&path, &[Row { id: 2, name: "b".into() }]).unwrap();

        let rows: Vec<Row> = read_json_list(&path).unwrap();
        assert_eq!(rows, vec![Row { id: 2, name: "b".into() }]);

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        write_json_atomic::<Row>(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(&path, "[{\"id\": ").unwrap();
        assert!(matches!(
            read_json_list::<Row>(&path),
            Err(Error::Json(_))
        ));
    }
}
