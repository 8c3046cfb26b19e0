//! Stylesheet bundling.
//!
//! Stage 2 of the build. Takes one entry stylesheet and produces a single
//! minified, content-hashed file:
//!
//! ```text
//! assets/css/styles.css          dist/css/styles.3f9a1c0e.css
//!   @import "base.css";     →    (base + components + styles rules,
//!   @import "components.css";     comments stripped, whitespace collapsed)
//! ```
//!
//! ## Import Resolution
//!
//! `@import "<path>";` statements are replaced by the referenced file's
//! content, itself recursively inlined. Paths resolve relative to the
//! importing file's directory. The walk is depth-first with an explicit
//! seen-set over canonical paths held by [`ImportResolver`]:
//!
//! - a file already seen (duplicate import or cycle) inlines as empty
//! - a missing imported file logs a warning and inlines as empty
//! - `@import` text inside a `/* */` comment is ignored
//!
//! Only the entry file itself is required to exist.
//!
//! ## Cache Busting
//!
//! The bundle filename carries the first `hash_length` hex digits of the
//! SHA-256 of the minified bytes, so any content change yields a new URL and
//! identical input always yields the same one.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CssError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Entry stylesheet not found: {0}")]
    MissingEntry(PathBuf),
}

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']([^"']+)["']\s*\)?\s*;"#).expect("valid regex")
});
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static PUNCT_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,])\s*").expect("valid regex"));

/// Result of bundling one entry stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct BundledCss {
    /// Hashed file name, e.g. `styles.3f9a1c0e.css`.
    pub file_name: String,
    /// Full path of the written bundle.
    pub path: PathBuf,
    /// Size of the minified bundle in bytes.
    pub size: u64,
}

/// Depth-first `@import` inliner with a seen-set over canonical paths.
///
/// One resolver covers one bundle: every distinct file is inlined at most
/// once, at its first encounter.
#[derive(Debug, Default)]
pub struct ImportResolver {
    seen: HashSet<PathBuf>,
}

impl ImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline the entry file and everything it imports.
    pub fn inline_entry(&mut self, entry: &Path) -> Result<String, CssError> {
        let canonical = match fs::canonicalize(entry) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CssError::MissingEntry(entry.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        self.seen.insert(canonical.clone());
        let source = fs::read_to_string(&canonical)?;
        self.inline_source(&source, &canonical)
    }

    /// Replace every import in `source` with the resolved content.
    ///
    /// `origin` is the canonical path of the file `source` was read from.
    /// Comments are dropped before scanning, so a commented-out `@import` is
    /// never followed and no inlined comment can end up nested in another.
    fn inline_source(&mut self, source: &str, origin: &Path) -> Result<String, CssError> {
        let base_dir = origin.parent().unwrap_or_else(|| Path::new("."));
        let stripped = COMMENT.replace_all(source, "");
        let source: &str = &stripped;
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for caps in IMPORT.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&source[last..whole.start()]);
            last = whole.end();
            out.push_str(&self.inline_import(&base_dir.join(&caps[1]), origin)?);
        }
        out.push_str(&source[last..]);
        Ok(out)
    }

    fn inline_import(&mut self, target: &Path, origin: &Path) -> Result<String, CssError> {
        let canonical = match fs::canonicalize(target) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    import = %target.display(),
                    from = %origin.display(),
                    "imported stylesheet not found, skipping"
                );
                return Ok(String::new());
            }
            Err(e) => return Err(e.into()),
        };
        if !self.seen.insert(canonical.clone()) {
            debug!(import = %canonical.display(), "already inlined");
            return Ok(String::new());
        }
        debug!(import = %canonical.display(), "inlining");
        let source = fs::read_to_string(&canonical)?;
        self.inline_source(&source, &canonical)
    }

    /// Canonical paths inlined so far, entry included.
    pub fn seen(&self) -> &HashSet<PathBuf> {
        &self.seen
    }
}

/// Minify a stylesheet.
///
/// Strips comments, collapses whitespace, removes spacing around
/// `{ } : ; ,` and drops the last `;` of each block.
pub fn minify_css(css: &str) -> String {
    let css = COMMENT.replace_all(css, "");
    let css = WHITESPACE.replace_all(&css, " ");
    let css = PUNCT_SPACE.replace_all(&css, "$1");
    css.replace(";}", "}").trim().to_string()
}

/// Short hex SHA-256 digest of `bytes`, truncated to `len` characters.
pub fn content_hash(bytes: &[u8], len: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(bytes));
    hex.truncate(len);
    hex
}

/// Insert the hash before the extension: `styles.css` → `styles.<hash>.css`.
pub fn hashed_file_name(entry: &Path, hash: &str) -> String {
    let stem = entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "styles".to_string());
    format!("{stem}.{hash}.css")
}

/// Inline, minify, hash and write the bundle for `entry` into `out_dir`.
pub fn bundle(entry: &Path, out_dir: &Path, hash_length: usize) -> Result<BundledCss, CssError> {
    info!(entry = %entry.display(), "bundling stylesheet");

    let mut resolver = ImportResolver::new();
    let inlined = resolver.inline_entry(entry)?;
    let minified = minify_css(&inlined);
    let hash = content_hash(minified.as_bytes(), hash_length);
    let file_name = hashed_file_name(entry, &hash);

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&file_name);
    fs::write(&path, &minified)?;

    info!(
        file = %file_name,
        sources = resolver.seen().len(),
        bytes = minified.len(),
        "stylesheet bundled"
    );
    Ok(BundledCss {
        file_name,
        path,
        size: minified.len() as u64,
    })
}
