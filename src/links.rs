//! Post-build internal link validation.
//!
//! Scans every HTML file in the output for `href`/`src` values and checks
//! that each relative reference points at a file that was actually
//! written. Problems are reported as warnings; the build result is the
//! same either way.
//!
//! | Reference | Treatment |
//! |-----------|-----------|
//! | `https://…`, `mailto:…`, `//cdn…` | skipped (absolute) |
//! | `#section`, `?q=1` | skipped (nothing left after stripping) |
//! | `/about.html` | resolved against the output root |
//! | `css/site.css` | resolved against the page's directory |
//! | `docs/` | resolved to `docs/index.html` |

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};
use walkdir::WalkDir;

static LINK_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(?:href|src)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid regex"));

/// A relative reference that does not resolve to an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Page containing the reference, relative to the output root.
    pub page: PathBuf,
    /// The attribute value as written.
    pub target: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.page.display(), self.target)
    }
}

/// All `href`/`src` attribute values in `html`, in document order.
pub fn extract_links(html: &str) -> Vec<&str> {
    LINK_ATTR
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .collect()
}

/// Whether a reference leaves the site (has a scheme or is protocol-relative).
pub fn is_absolute(link: &str) -> bool {
    link.starts_with("//") || SCHEME.is_match(link)
}

/// Resolve a relative reference to the output file it should point at.
///
/// Returns `None` for references that name no file (pure fragments or
/// queries). `page_dir` is the directory of the referencing page.
pub fn resolve_link(output_dir: &Path, page_dir: &Path, link: &str) -> Option<PathBuf> {
    let path = link
        .split(['#', '?'])
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return None;
    }
    let (base, rel) = match path.strip_prefix('/') {
        Some(rest) => (output_dir, rest),
        None => (page_dir, path),
    };
    let mut resolved = base.join(rel);
    if path.ends_with('/') {
        resolved.push("index.html");
    }
    Some(resolved)
}

/// Check every HTML page under `output_dir` and report broken references.
pub fn validate_links(output_dir: &Path) -> Result<Vec<BrokenLink>, walkdir::Error> {
    let mut broken = Vec::new();
    let mut checked = 0;

    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let html = match std::fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) => {
                warn!(page = %path.display(), error = %e, "could not read page for link check");
                continue;
            }
        };
        let page_dir = path.parent().unwrap_or(output_dir);
        let page = path.strip_prefix(output_dir).unwrap_or(path).to_path_buf();

        for link in extract_links(&html) {
            if is_absolute(link) {
                continue;
            }
            let Some(target) = resolve_link(output_dir, page_dir, link) else {
                continue;
            };
            checked += 1;
            if !target.is_file() {
                let link = BrokenLink {
                    page: page.clone(),
                    target: link.to_string(),
                };
                warn!(page = %link.page.display(), target = %link.target, "broken internal link");
                broken.push(link);
            }
        }
    }

    info!(checked, broken = broken.len(), "link check finished");
    Ok(broken)
}
