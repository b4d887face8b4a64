//! Whole-document file I/O.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

use super::{SyncError, SyncResult};

/// Read the whole document.
pub(crate) fn read_bytes(path: &Path) -> SyncResult<Vec<u8>> {
    fs::read(path).map_err(|source| SyncError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the document at `path` with `root`.
///
/// The JSON goes to a temporary file in the same directory, is flushed, and
/// is then renamed over the target. An existing document's permissions are
/// carried over to the replacement.
pub(crate) fn write_atomic(path: &Path, root: &Value) -> SyncResult<()> {
    let unavailable = |source: io::Error| SyncError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut bytes = serde_json::to_vec_pretty(root)?;
    bytes.push(b'\n');

    let mut tmp = NamedTempFile::new_in(dir).map_err(unavailable)?;
    tmp.write_all(&bytes).map_err(unavailable)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(unavailable)?;
    }
    tmp.as_file().sync_all().map_err(unavailable)?;
    tmp.persist(path).map_err(|e| unavailable(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_atomic(&path, &json!({"persons": []})).unwrap();
        let bytes = read_bytes(&path).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"persons": []}));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_atomic(&path, &json!({"a": 1})).unwrap();
        write_atomic(&path, &json!({"a": 2})).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&path, &json!({"persons": []})).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_bytes(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("data.json");
        let err = write_atomic(&path, &json!({})).unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable { .. }));
    }
}
