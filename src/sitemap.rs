//! Sitemap and robots.txt generation.
//!
//! Both files are derived from what actually landed in the output root:
//! every top-level `.html` file becomes one sitemap entry, with
//! `index.html` standing for the site root.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

const INDEX: &str = "index.html";

/// Top-level `.html` files in `output_dir`, `index.html` first, then by name.
pub fn html_pages(output_dir: &Path) -> Result<Vec<String>, SitemapError> {
    let mut pages: Vec<String> = fs::read_dir(output_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "html"))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    pages.sort_by(|a, b| (a != INDEX, a).cmp(&(b != INDEX, b)));
    Ok(pages)
}

/// Public URL for a page file.
pub fn page_url(base_url: &str, file_name: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if file_name == INDEX {
        format!("{base}/")
    } else {
        format!("{base}/{file_name}")
    }
}

/// Render `sitemap.xml` with one `<url>` per page.
pub fn render_sitemap(base_url: &str, pages: &[String]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for page in pages {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&page_url(base_url, page))
        ));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render `robots.txt`: full crawl access plus the sitemap location.
pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

pub fn write_sitemap(output_dir: &Path, base_url: &str) -> Result<usize, SitemapError> {
    let pages = html_pages(output_dir)?;
    info!(count = pages.len(), "generating sitemap.xml");
    fs::write(
        output_dir.join("sitemap.xml"),
        render_sitemap(base_url, &pages),
    )?;
    Ok(pages.len())
}

pub fn write_robots(output_dir: &Path, base_url: &str) -> Result<(), SitemapError> {
    info!("generating robots.txt");
    fs::write(output_dir.join("robots.txt"), render_robots(base_url))?;
    Ok(())
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
