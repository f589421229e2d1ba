//! Replace-via-temp-file helper
//!
//! Every rewrite of a record or of the index goes through [`replace_file`]: the
//! new content is written in full to a temporary file in the target's directory
//! and only then renamed over the target. Readers of the real path observe
//! either the old or the new content, never a partial write.

use crate::types::BankError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Atomically replace `path` with `contents`
///
/// # Errors
///
/// Returns `StorageError` if the temporary file cannot be created or written,
/// or if the final rename fails. In every case `path` is left untouched and the
/// temporary file is removed.
pub fn replace_file(path: &Path, contents: &[u8]) -> Result<(), BankError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| BankError::storage(dir, e))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| BankError::storage(temp.path(), e))?;

    let temp_path = temp.path().to_path_buf();
    temp.persist(path)
        .map_err(|e| BankError::storage(path, e.error))?;

    debug!(path = %path.display(), temp = %temp_path.display(), "Swapped file into place");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_replace_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1234567.txt");

        replace_file(&path, b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_replace_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.txt");
        fs::write(&path, "old\n").unwrap();

        replace_file(&path, b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_replace_fails_when_directory_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("1234567.txt");

        let result = replace_file(&path, b"data");

        assert!(matches!(result, Err(BankError::StorageError { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_replace_keeps_target_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1234567.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "original").unwrap();

        let result = replace_file(&path, b"new contents");

        assert!(matches!(result, Err(BankError::StorageError { .. })));
        assert_eq!(fs::read_to_string(path.join("keep")).unwrap(), "original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
