use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AppError, Result};

/// Create an empty file at `path` unless something is already there.
///
/// Missing parent directories are created first. Returns `true` when the
/// file was created, `false` when it already existed. Existing content is
/// never touched.
pub fn create_file_if_absent(path: &Path) -> Result<bool> {
    let failed = |source| AppError::CreateFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(failed)?;
    }

    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(failed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("a.test.ts");
        assert!(create_file_if_absent(&file_path).unwrap());
        assert!(file_path.is_file());
    }

    #[test]
    fn test_create_file_with_missing_parents() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("tests").join("willHaveTest.test.ts");
        assert!(create_file_if_absent(&file_path).unwrap());
        assert!(tmp.path().join("tests").is_dir());
        assert!(file_path.is_file());
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("keep.test.ts");
        fs::write(&file_path, "it('works')").unwrap();
        assert!(!create_file_if_absent(&file_path).unwrap());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "it('works')");
    }

    #[test]
    fn test_parent_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("tests");
        fs::write(&blocker, "").unwrap();
        let err = create_file_if_absent(&blocker.join("a.test.ts")).unwrap_err();
        assert!(matches!(err, AppError::CreateFailed { .. }));
    }
}
