//! Static asset copying.
//!
//! Scripts, images and icons are published as-is: each configured
//! subdirectory of the asset directory is mirrored into the output root.
//! Stylesheets are not copied; they only reach the output through the
//! bundle written by [`crate::css`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Recursively copy `src` into `dst`, skipping hidden entries.
///
/// Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, AssetError> {
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| AssetError::InvalidPath(entry.path().to_path_buf()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            debug!(file = %rel.display(), "copied asset");
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy each named subdirectory of `assets_dir` into `output_dir`.
///
/// Missing subdirectories are skipped with a warning.
pub fn copy_assets(
    assets_dir: &Path,
    names: &[String],
    output_dir: &Path,
) -> Result<usize, AssetError> {
    let mut total = 0;
    for name in names {
        let src = assets_dir.join(name);
        if !src.is_dir() {
            warn!(dir = %src.display(), "asset directory not found, skipping");
            continue;
        }
        let copied = copy_dir_recursive(&src, &output_dir.join(name))?;
        info!(dir = %name, files = copied, "copied assets");
        total += copied;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_nested_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("img");
        write(&src.join("logo.svg"), "<svg/>");
        write(&src.join("team/ada.png"), "png");

        let dst = tmp.path().join("out/img");
        let copied = copy_dir_recursive(&src, &dst).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("logo.svg")).unwrap(), "<svg/>");
        assert_eq!(fs::read_to_string(dst.join("team/ada.png")).unwrap(), "png");
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("js");
        write(&src.join("main.js"), "");
        write(&src.join(".DS_Store"), "");
        write(&src.join(".cache/x.js"), "");

        let dst = tmp.path().join("out/js");
        assert_eq!(copy_dir_recursive(&src, &dst).unwrap(), 1);
        assert!(!dst.join(".DS_Store").exists());
        assert!(!dst.join(".cache").exists());
    }

    #[test]
    fn copy_assets_skips_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        write(&assets.join("js/main.js"), "console.log(1)");
        write(&assets.join("css/styles.css"), "body{}");
        let out = tmp.path().join("dist");

        let names = vec!["js".to_string(), "icons".to_string()];
        let copied = copy_assets(&assets, &names, &out).unwrap();
        assert_eq!(copied, 1);
        assert!(out.join("js/main.js").exists());
        assert!(!out.join("icons").exists());
        assert!(!out.join("css").exists());
    }
}
