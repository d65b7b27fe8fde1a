//! Filesystem helpers for data directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DataError;

/// Every file under `root` (recursively) with the given extension, sorted.
///
/// A missing `root` yields an empty list.
pub fn collect_files_with_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>, DataError> {
    let mut files = Vec::new();
    if root.is_dir() {
        collect_recursive(root, extension, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn collect_recursive(current: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<(), DataError> {
    let entries = fs::read_dir(current).map_err(|source| DataError::io(current, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| DataError::io(current, source))?;
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(&path, extension, files)?;
        } else if has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Make sure `path` exists and is empty.
pub fn clear_directory(path: &Path) -> Result<(), DataError> {
    fs::create_dir_all(path).map_err(|source| DataError::io(path, source))?;
    let entries = fs::read_dir(path).map_err(|source| DataError::io(path, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| DataError::io(path, source))?;
        let child = entry.path();
        let removed = if child.is_dir() {
            fs::remove_dir_all(&child)
        } else {
            fs::remove_file(&child)
        };
        removed.map_err(|source| DataError::io(&child, source))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_recursive_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("gems/crystal")).unwrap();
        fs::write(root.join("lars.json"), "{}").unwrap();
        fs::write(root.join("gems/crystal/pearl.JSON"), "{}").unwrap();
        fs::write(root.join("gems/notes.txt"), "").unwrap();

        let files = collect_files_with_extension(root, "json").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("gems/crystal/pearl.JSON")));
        assert!(files.iter().all(|p| !p.ends_with("notes.txt")));
    }

    #[test]
    fn test_collect_missing_root_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let files = collect_files_with_extension(&dir.path().join("nope"), "json").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_clear_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let scratch = dir.path().join("ChunksTemp");

        clear_directory(&scratch).unwrap();
        assert!(scratch.is_dir());

        fs::create_dir_all(scratch.join("layer")).unwrap();
        fs::write(scratch.join("layer/0,0.bin"), "x").unwrap();
        fs::write(scratch.join("stale.bin"), "x").unwrap();

        clear_directory(&scratch).unwrap();
        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }
}
