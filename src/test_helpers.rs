//! Shared test utilities for the sitebake test suite.
//!
//! Provides an isolated copy of the fixture project and small lookups over
//! build results.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = build(&SiteConfig::default(), tmp.path()).unwrap();
//!
//! assert_eq!(page_names(&report), vec!["about.html", "index.html"]);
//! let index = read_output(&tmp, "index.html");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::assets::copy_dir_recursive;
use crate::pipeline::BuildReport;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Read a built file relative to the fixture's `dist/`. Panics if absent.
pub fn read_output(tmp: &TempDir, rel: &str) -> String {
    let path = tmp.path().join("dist").join(rel);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("output file '{}' unreadable: {e}", path.display()))
}

/// Built page file names in build order.
pub fn page_names(report: &BuildReport) -> Vec<&str> {
    report.pages.iter().map(|p| p.file_name.as_str()).collect()
}
