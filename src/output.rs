//! CLI output formatting for the build pipeline.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Stylesheet → css/styles.3f9a1c0e.css (4.2 KiB)
//! Assets: 12 files copied
//!
//! Pages
//! 001 about.html (6.1 KiB)
//! 002 index.html (9.8 KiB)
//!
//! Sitemap: 2 urls
//!
//! Links
//!     about.html → /pricing.html
//!
//! Sizes
//!     about.html           6.1 KiB
//!     css/styles.3f9a1c0e.css  4.2 KiB
//!     ...
//! Total: 14 files, 41.0 KiB
//! ```
//!
//! ## Check
//!
//! ```text
//! Links
//!     All internal links resolve
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. [`collect_sizes`] is the
//! one exception here that touches the filesystem, and it only reads.

use crate::links::BrokenLink;
use crate::pipeline::BuildReport;
use std::path::Path;
use walkdir::WalkDir;

/// Size of one file in the output, keyed by its path relative to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSize {
    /// Relative path with `/` separators.
    pub path: String,
    pub size: u64,
}

/// Every file under `output_dir` with its size, sorted by relative path.
pub fn collect_sizes(output_dir: &Path) -> Result<Vec<FileSize>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(output_dir).unwrap_or(entry.path());
        let path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(FileSize {
            path,
            size: entry.metadata()?.len(),
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Human-readable byte count: `512 B`, `4.2 KiB`, `1.3 MiB`.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / MIB)
    }
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_links(broken: &[BrokenLink]) -> Vec<String> {
    let mut lines = vec!["Links".to_string()];
    if broken.is_empty() {
        lines.push(format!("{}All internal links resolve", indent(1)));
    } else {
        for link in broken {
            lines.push(format!("{}{}", indent(1), link));
        }
        lines.push(format!("{}{} broken", indent(1), broken.len()));
    }
    lines
}

/// Format the summary of a finished build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Stylesheet → css/{} ({})",
        report.css.file_name,
        format_size(report.css.size)
    ));
    lines.push(format!("Assets: {} files copied", report.assets_copied));

    lines.push(String::new());
    lines.push("Pages".to_string());
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            page.file_name,
            format_size(page.size)
        ));
    }

    if let Some(count) = report.sitemap_entries {
        lines.push(String::new());
        lines.push(format!("Sitemap: {count} urls"));
    }

    lines.push(String::new());
    lines.extend(format_links(&report.broken_links));

    lines.push(String::new());
    lines.push("Sizes".to_string());
    let width = report.files.iter().map(|f| f.path.len()).max().unwrap_or(0);
    for file in &report.files {
        lines.push(format!(
            "{}{:<width$}  {}",
            indent(1),
            file.path,
            format_size(file.size)
        ));
    }
    lines.push(format!(
        "Total: {} files, {}",
        report.files.len(),
        format_size(report.total_size())
    ));

    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

/// Format the result of a standalone link check.
pub fn format_check_output(broken: &[BrokenLink]) -> Vec<String> {
    format_links(broken)
}

pub fn print_check_output(broken: &[BrokenLink]) {
    for line in format_check_output(broken) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::BundledCss;
    use crate::page::BuiltPage;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn report(broken: Vec<BrokenLink>) -> BuildReport {
        BuildReport {
            css: BundledCss {
                file_name: "styles.abcd1234.css".to_string(),
                path: PathBuf::from("dist/css/styles.abcd1234.css"),
                size: 2048,
            },
            pages: vec![
                BuiltPage {
                    file_name: "about.html".to_string(),
                    size: 300,
                },
                BuiltPage {
                    file_name: "index.html".to_string(),
                    size: 900,
                },
            ],
            assets_copied: 3,
            sitemap_entries: Some(2),
            broken_links: broken,
            files: vec![
                FileSize {
                    path: "about.html".to_string(),
                    size: 300,
                },
                FileSize {
                    path: "css/styles.abcd1234.css".to_string(),
                    size: 2048,
                },
                FileSize {
                    path: "index.html".to_string(),
                    size: 900,
                },
            ],
        }
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn build_output_lists_pages_and_total() {
        let lines = format_build_output(&report(vec![]));
        assert_eq!(lines[0], "Stylesheet → css/styles.abcd1234.css (2.0 KiB)");
        assert_eq!(lines[1], "Assets: 3 files copied");
        assert!(lines.contains(&"001 about.html (300 B)".to_string()));
        assert!(lines.contains(&"002 index.html (900 B)".to_string()));
        assert!(lines.contains(&"Sitemap: 2 urls".to_string()));
        assert!(lines.contains(&"    All internal links resolve".to_string()));
        assert_eq!(lines.last().unwrap(), "Total: 3 files, 3.2 KiB");
    }

    #[test]
    fn build_output_aligns_sizes() {
        let lines = format_build_output(&report(vec![]));
        assert!(lines.contains(&"    about.html               300 B".to_string()));
        assert!(lines.contains(&"    css/styles.abcd1234.css  2.0 KiB".to_string()));
    }

    #[test]
    fn build_output_lists_broken_links() {
        let lines = format_build_output(&report(vec![BrokenLink {
            page: PathBuf::from("index.html"),
            target: "/missing.html".to_string(),
        }]));
        assert!(lines.contains(&"    index.html → /missing.html".to_string()));
        assert!(lines.contains(&"    1 broken".to_string()));
    }

    #[test]
    fn check_output_clean() {
        assert_eq!(
            format_check_output(&[]),
            vec!["Links", "    All internal links resolve"]
        );
    }

    #[test]
    fn collect_sizes_walks_tree_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("css")).unwrap();
        fs::write(tmp.path().join("index.html"), "12345").unwrap();
        fs::write(tmp.path().join("css/a.css"), "12").unwrap();
        fs::write(tmp.path().join("about.html"), "").unwrap();

        let files = collect_sizes(tmp.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["about.html", "css/a.css", "index.html"]);
        assert_eq!(files[1].size, 2);
        assert_eq!(files[2].size, 5);
    }
}
