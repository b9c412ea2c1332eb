//! Output directory traversal

use crate::Result;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every non-directory entry under `root`, recursively.
///
/// A file root yields itself and a missing root yields nothing. Any other
/// filesystem error aborts the walk. Symlinks are reported, not followed.
/// Paths come back in traversal order.
pub fn collect_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    match std::fs::symlink_metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let files = collect_files(dir.path().join("dist")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_file_root_yields_itself() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        fs::write(&file, "<html></html>").unwrap();

        assert_eq!(collect_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_recursive_walk() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("assets/js")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("assets/app.css"), "body {}").unwrap();
        fs::write(root.join("assets/js/app.js"), "console.log(1)").unwrap();

        let mut files = collect_files(root).unwrap();
        files.sort();

        assert_eq!(
            files,
            vec![
                root.join("assets/app.css"),
                root.join("assets/js/app.js"),
                root.join("index.html"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_other_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "not a directory").unwrap();

        // ENOTDIR, not NotFound
        let result = collect_files(file.join("child"));
        assert!(matches!(result, Err(crate::CompressionError::Io(_))));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(collect_files(dir.path()).unwrap().is_empty());
    }
}
