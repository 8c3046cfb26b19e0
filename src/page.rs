//! Page assembly and HTML minification.
//!
//! Stage 5 of the build. Each page shell in the pages directory is a regular
//! HTML document with marker comments where sections go:
//!
//! ```html
//! <!DOCTYPE html>
//! <html lang="en">
//! <head><!-- head --></head>
//! <body>
//!   <!-- header -->
//!   <main><!-- hero --><!-- about --><!-- services --><!-- contact --></main>
//!   <!-- footer -->
//! </body>
//! </html>
//! ```
//!
//! A shell may use any subset of the markers. After the sections are in
//! place, the unhashed stylesheet reference is pointed at the bundle, the
//! authoring path prefix is removed, and the result is minified and written
//! under the same file name in the output root.

use crate::inject::Sections;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No page shells (*.html) found in {0}")]
    NoPages(PathBuf),
}

/// Per-page transforms applied after the sections are placed.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Stylesheet reference as authored, e.g. `css/styles.css`.
    pub css_link: String,
    /// Replacement reference, e.g. `css/styles.3f9a1c0e.css`.
    pub hashed_css_link: String,
    /// Authoring prefix removed from the page. Empty disables it.
    pub strip_prefix: String,
    pub minify: bool,
}

/// One page written to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPage {
    pub file_name: String,
    pub size: u64,
}

/// Marker comment for each section, in placement order.
pub fn section_markers(sections: &Sections) -> [(&'static str, &str); 7] {
    [
        ("<!-- head -->", sections.head.as_str()),
        ("<!-- header -->", sections.header.as_str()),
        ("<!-- hero -->", sections.hero.as_str()),
        ("<!-- about -->", sections.about.as_str()),
        ("<!-- services -->", sections.services.as_str()),
        ("<!-- contact -->", sections.contact.as_str()),
        ("<!-- footer -->", sections.footer.as_str()),
    ]
}

/// Place the resolved sections into a page shell and apply the page transforms.
pub fn assemble_page(shell: &str, sections: &Sections, options: &PageOptions) -> String {
    let mut html = section_markers(sections)
        .into_iter()
        .fold(shell.to_string(), |html, (marker, section)| {
            html.replace(marker, section)
        });

    if !options.css_link.is_empty() {
        html = html.replace(&options.css_link, &options.hashed_css_link);
    }
    if !options.strip_prefix.is_empty() {
        html = html.replace(&options.strip_prefix, "");
    }
    if options.minify {
        html = minify_html(&html);
    }
    html
}

/// Minify an HTML document.
///
/// Removes comments, trims each line, joins the lines, drops whitespace
/// between tags and collapses the remaining runs to a single space.
///
/// Lines are joined directly when the break sits next to a tag, and with one
/// space when it separates two runs of text.
pub fn minify_html(html: &str) -> String {
    let html = HTML_COMMENT.replace_all(html, "");
    let mut joined = String::with_capacity(html.len());
    for line in html.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if !joined.is_empty() && !joined.ends_with('>') && !line.starts_with('<') {
            joined.push(' ');
        }
        joined.push_str(line);
    }
    let joined = BETWEEN_TAGS.replace_all(&joined, "><");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

/// Page shells in `pages_dir`, sorted by file name.
pub fn page_shells(pages_dir: &Path) -> Result<Vec<PathBuf>, PageError> {
    let mut shells: Vec<PathBuf> = fs::read_dir(pages_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    if shells.is_empty() {
        return Err(PageError::NoPages(pages_dir.to_path_buf()));
    }
    shells.sort();
    Ok(shells)
}

/// Assemble every page shell and write it to `output_dir`.
pub fn build_pages(
    pages_dir: &Path,
    output_dir: &Path,
    sections: &Sections,
    options: &PageOptions,
) -> Result<Vec<BuiltPage>, PageError> {
    let shells = page_shells(pages_dir)?;
    info!(count = shells.len(), "assembling pages");

    let mut pages = Vec::with_capacity(shells.len());
    for shell_path in shells {
        let Some(file_name) = shell_path.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy().into_owned();
        let shell = fs::read_to_string(&shell_path)?;
        let html = assemble_page(&shell, sections, options);

        let leftover = crate::inject::unresolved_placeholders(&html);
        if !leftover.is_empty() {
            warn!(page = %file_name, placeholders = ?leftover, "unresolved placeholders");
        }

        fs::write(output_dir.join(&file_name), &html)?;
        debug!(page = %file_name, bytes = html.len(), "wrote page");
        pages.push(BuiltPage {
            file_name,
            size: html.len() as u64,
        });
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sections() -> Sections {
        Sections {
            head: r#"<link rel="stylesheet" href="css/styles.css">"#.to_string(),
            header: r#"<nav><a href="pages/about.html">About</a></nav>"#.to_string(),
            hero: "<h1>Hero</h1>".to_string(),
            about: "<h2>About</h2>".to_string(),
            services: "<h2>Services</h2>".to_string(),
            contact: "<h2>Contact</h2>".to_string(),
            footer: "<footer>Foot</footer>".to_string(),
        }
    }

    fn options(minify: bool) -> PageOptions {
        PageOptions {
            css_link: "css/styles.css".to_string(),
            hashed_css_link: "css/styles.abcd1234.css".to_string(),
            strip_prefix: "pages/".to_string(),
            minify,
        }
    }

    const SHELL: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <!-- head -->\n  </head>\n  <body>\n    <!-- header -->\n    <main>\n      <!-- hero -->\n      <!-- about -->\n      <!-- services -->\n      <!-- contact -->\n    </main>\n    <!-- footer -->\n  </body>\n</html>\n";

    // =========================================================================
    // Minification
    // =========================================================================

    #[test]
    fn minify_removes_comments() {
        let html = minify_html("<p>a</p><!-- note --><!--\nmulti\n--><p>b</p>");
        assert_eq!(html, "<p>a</p><p>b</p>");
    }

    #[test]
    fn minify_removes_inter_tag_whitespace_and_newlines() {
        let html = minify_html("<ul>\n    <li>One</li>\n    <li>Two</li>\n</ul>\n");
        assert_eq!(html, "<ul><li>One</li><li>Two</li></ul>");
    }

    #[test]
    fn minify_keeps_words_apart_across_lines() {
        let html = minify_html("<p>\n  Hello\n  world,   again\n</p>");
        assert_eq!(html, "<p>Hello world, again</p>");
        let html = minify_html("<p>Hello <b>bold</b> text</p>");
        assert_eq!(html, "<p>Hello <b>bold</b> text</p>");
    }

    #[test]
    fn minify_leaves_no_double_whitespace() {
        let html = minify_html(SHELL);
        assert!(!html.contains("<!--"));
        assert!(!html.contains('\n'));
        assert!(
            !html
                .as_bytes()
                .windows(2)
                .any(|w| w[0].is_ascii_whitespace() && w[1].is_ascii_whitespace())
        );
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    #[test]
    fn assemble_places_sections_and_rewrites_links() {
        let html = assemble_page(SHELL, &sections(), &options(true));
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head><link rel=\"stylesheet\" href=\"css/styles.abcd1234.css\"></head>\
             <body><nav><a href=\"about.html\">About</a></nav><main><h1>Hero</h1><h2>About</h2>\
             <h2>Services</h2><h2>Contact</h2></main><footer>Foot</footer></body></html>"
        );
    }

    #[test]
    fn assemble_without_minify_keeps_layout() {
        let html = assemble_page(SHELL, &sections(), &options(false));
        assert!(html.contains("\n    <main>\n"));
        assert!(html.contains("css/styles.abcd1234.css"));
        assert!(!html.contains("<!-- hero -->"));
    }

    #[test]
    fn assemble_with_subset_of_markers() {
        let shell = "<head><!-- head --></head><body><!-- footer --></body>";
        let html = assemble_page(shell, &sections(), &options(true));
        assert!(html.contains("styles.abcd1234.css"));
        assert!(html.contains("<footer>Foot</footer>"));
        assert!(!html.contains("Hero"));
    }

    #[test]
    fn empty_strip_prefix_keeps_links() {
        let mut opts = options(true);
        opts.strip_prefix.clear();
        let html = assemble_page("<!-- header -->", &sections(), &opts);
        assert!(html.contains("pages/about.html"));
    }

    // =========================================================================
    // Filesystem
    // =========================================================================

    #[test]
    fn page_shells_sorted_html_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "").unwrap();
        fs::write(tmp.path().join("about.html"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        let shells = page_shells(tmp.path()).unwrap();
        let names: Vec<_> = shells
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["about.html", "index.html"]);
    }

    #[test]
    fn page_shells_empty_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            page_shells(tmp.path()),
            Err(PageError::NoPages(_))
        ));
    }

    #[test]
    fn page_shells_missing_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            page_shells(&tmp.path().join("pages")),
            Err(PageError::Io(_))
        ));
    }

    #[test]
    fn build_pages_writes_same_named_files() {
        let tmp = TempDir::new().unwrap();
        let pages_dir = tmp.path().join("pages");
        let out = tmp.path().join("dist");
        fs::create_dir_all(&pages_dir).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(pages_dir.join("index.html"), SHELL).unwrap();
        fs::write(pages_dir.join("privacy.html"), "<!-- head --><p>Privacy</p>").unwrap();

        let built = build_pages(&pages_dir, &out, &sections(), &options(true)).unwrap();
        assert_eq!(built.len(), 2);
        assert_eq!(built[0].file_name, "index.html");
        let privacy = fs::read_to_string(out.join("privacy.html")).unwrap();
        assert_eq!(
            privacy,
            r#"<link rel="stylesheet" href="css/styles.abcd1234.css"><p>Privacy</p>"#
        );
        assert_eq!(built[1].size, privacy.len() as u64);
    }
}
