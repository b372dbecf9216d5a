//! # Path Discovery
//!
//! Walks a source tree and collects image paths by extension. Hidden
//! entries are skipped; unreadable entries are logged and skipped rather
//! than failing the batch. Output is sorted so runs are deterministic.

use crate::error::DiscoverError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Extensions treated as images (case-insensitive).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Recursively collect image paths under `root`, sorted.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.path() == root || !is_hidden(e.path()))
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_image(path) {
                    paths.push(path.to_path_buf());
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
            }
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = discover_images(Path::new("/nonexistent/leaves")).unwrap_err();
        assert!(matches!(err, DiscoverError::SourceNotFound { .. }));
    }

    #[test]
    fn finds_images_recursively_and_sorted() {
        let dir = TempDir::new().unwrap();
        let class = dir.path().join("Apple_rust");
        fs::create_dir_all(&class).unwrap();
        touch(&class.join("b.jpg"));
        touch(&class.join("a.JPG"));
        touch(&dir.path().join("notes.txt"));

        let paths = discover_images(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("Apple_rust/a.JPG"));
        assert!(paths[1].ends_with("Apple_rust/b.jpg"));
    }

    #[test]
    fn skips_hidden_entries() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("visible.png"));
        touch(&dir.path().join(".hidden.png"));
        let hidden_dir = dir.path().join(".cache");
        fs::create_dir_all(&hidden_dir).unwrap();
        touch(&hidden_dir.join("cached.png"));

        let paths = discover_images(dir.path()).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("visible.png"));
    }
}
