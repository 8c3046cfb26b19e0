//! Build orchestration.
//!
//! Runs every stage in order against one project root. Each stage finishes
//! all of its writes before the next one starts:
//!
//! ```text
//! prepare output → bundle CSS → copy assets → inject content
//!   → build pages → sitemap/robots → validate links → size report
//! ```
//!
//! Inputs are loaded eagerly. A missing page shell directory, partial,
//! content document or entry stylesheet aborts the run. Everything that is
//! only worth a warning (missing CSS import, missing asset folder, broken
//! link) is logged and the build carries on.

use crate::assets::{self, AssetError};
use crate::config::{SiteConfig, SiteLayout};
use crate::content::{self, ContentError};
use crate::css::{self, BundledCss, CssError};
use crate::inject;
use crate::links::{self, BrokenLink};
use crate::output::{self, FileSize};
use crate::page::{self, BuiltPage, PageError, PageOptions};
use crate::partials::{PartialError, Partials};
use crate::sitemap::{self, SitemapError};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Stylesheet error: {0}")]
    Css(#[from] CssError),
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Partial error: {0}")]
    Partial(#[from] PartialError),
    #[error("Page error: {0}")]
    Page(#[from] PageError),
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub css: BundledCss,
    pub pages: Vec<BuiltPage>,
    pub assets_copied: usize,
    pub sitemap_entries: Option<usize>,
    pub broken_links: Vec<BrokenLink>,
    pub files: Vec<FileSize>,
}

impl BuildReport {
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Delete `output_dir` if present and recreate it empty.
pub fn prepare_output(output_dir: &Path) -> io::Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)
}

/// Run the full build for the project at `root`.
pub fn build(config: &SiteConfig, root: &Path) -> Result<BuildReport, BuildError> {
    let layout = config.layout(root);
    build_layout(config, &layout)
}

/// Run the full build with an already resolved layout.
pub fn build_layout(config: &SiteConfig, layout: &SiteLayout) -> Result<BuildReport, BuildError> {
    let out = &layout.output_dir;

    info!(output = %out.display(), "preparing output");
    prepare_output(out)?;

    let css = css::bundle(
        &layout.css_source_dir().join(&config.css.entry),
        &layout.css_output_dir(),
        config.css.hash_length,
    )?;

    let assets_copied = assets::copy_assets(&layout.assets_dir, &config.assets.copy, out)?;

    info!(content = %layout.content_file.display(), "injecting content");
    let content = content::load_content(&layout.content_file)?;
    let partials = Partials::load(&layout.partials_dir)?;
    let sections = inject::render_sections(&partials, &content)?;

    let options = PageOptions {
        css_link: config.css.link_path(),
        hashed_css_link: format!("css/{}", css.file_name),
        strip_prefix: config.html.strip_prefix.clone(),
        minify: config.html.minify,
    };
    let pages = page::build_pages(&layout.pages_dir, out, &sections, &options)?;

    let sitemap_entries = if config.sitemap.enabled {
        Some(sitemap::write_sitemap(out, &config.base_url)?)
    } else {
        None
    };
    if config.sitemap.robots {
        sitemap::write_robots(out, &config.base_url)?;
    }

    let broken_links = if config.links.validate {
        links::validate_links(out)?
    } else {
        Vec::new()
    };

    let files = output::collect_sizes(out)?;

    Ok(BuildReport {
        css,
        pages,
        assets_copied,
        sitemap_entries,
        broken_links,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn prepare_output_clears_previous_build() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("dist");
        fs::create_dir_all(out.join("old")).unwrap();
        fs::write(out.join("old/stale.html"), "").unwrap();

        prepare_output(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn build_produces_expected_tree() {
        let tmp = setup_fixtures();
        let config = SiteConfig::default();
        let report = build(&config, tmp.path()).unwrap();
        let out = tmp.path().join("dist");

        assert_eq!(page_names(&report), vec!["about.html", "index.html"]);
        assert!(out.join("css").join(&report.css.file_name).is_file());
        assert!(out.join("js/main.js").is_file());
        assert!(out.join("img/logo.svg").is_file());
        assert!(out.join("icons/favicon.svg").is_file());
        assert!(out.join("sitemap.xml").is_file());
        assert!(out.join("robots.txt").is_file());
        assert_eq!(report.sitemap_entries, Some(2));
        assert_eq!(report.assets_copied, 3);
        assert!(report.broken_links.is_empty(), "{:?}", report.broken_links);
    }

    #[test]
    fn index_page_is_fully_resolved() {
        let tmp = setup_fixtures();
        let report = build(&SiteConfig::default(), tmp.path()).unwrap();
        let index = read_output(&tmp, "index.html");

        assert!(index.contains(&format!("href=\"css/{}\"", report.css.file_name)));
        assert!(!index.contains("css/styles.css"));
        assert!(!index.contains("pages/"));
        assert!(!index.contains("{{"));
        assert!(index.contains("<li class=\"invoice\">312</li>"));
        assert!(index.contains("<h3>Reports</h3>"));
    }

    #[test]
    fn build_respects_disabled_outputs() {
        let tmp = setup_fixtures();
        let mut config = SiteConfig::default();
        config.sitemap.enabled = false;
        config.sitemap.robots = false;
        config.links.validate = false;
        let report = build(&config, tmp.path()).unwrap();

        assert_eq!(report.sitemap_entries, None);
        assert!(!tmp.path().join("dist/sitemap.xml").exists());
        assert!(!tmp.path().join("dist/robots.txt").exists());
    }

    #[test]
    fn build_fails_on_missing_partial() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("src/partials/contact.html")).unwrap();
        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Partial(PartialError::Missing { .. })
        ));
    }

    #[test]
    fn build_fails_on_missing_content() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("src/content/content.json")).unwrap();
        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::Content(ContentError::Missing(_))));
    }

    #[test]
    fn build_fails_on_missing_css_entry() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("src/assets/css/styles.css")).unwrap();
        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::Css(CssError::MissingEntry(_))));
    }

    #[test]
    fn report_total_matches_files() {
        let tmp = setup_fixtures();
        let report = build(&SiteConfig::default(), tmp.path()).unwrap();
        let sum: u64 = report.files.iter().map(|f| f.size).sum();
        assert_eq!(report.total_size(), sum);
        assert!(report.files.iter().any(|f| f.path == "sitemap.xml"));
    }
}
