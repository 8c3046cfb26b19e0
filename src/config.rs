//! Build configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! the base layer; a `site.toml` in the project root overrides any subset of
//! them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "https://example.com"   # Used for sitemap.xml and robots.txt
//!
//! [paths]
//! source = "src"                     # Source root, relative to the project root
//! pages = "pages"                    # Page shells, relative to source
//! partials = "partials"              # HTML fragments, relative to source
//! assets = "assets"                  # css/ js/ img/ icons/, relative to source
//! content = "content/content.json"   # Content document, relative to source
//! output = "dist"                    # Output root, relative to the project root
//!
//! [css]
//! entry = "styles.css"               # Entry stylesheet under assets/css/
//! hash_length = 8                    # Hex digits of the content hash in the filename
//!
//! [assets]
//! copy = ["js", "img", "icons"]      # Asset subdirectories copied verbatim
//!
//! [html]
//! strip_prefix = "pages/"            # Authoring prefix removed from page links
//! minify = true
//!
//! [sitemap]
//! enabled = true                     # Write sitemap.xml
//! robots = true                      # Write robots.txt
//!
//! [links]
//! validate = true                    # Report broken internal links after the build
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `site.toml`.
///
/// All fields have defaults matching the conventional project layout, so a
/// project without a config file builds as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public URL of the deployed site, without trailing slash.
    pub base_url: String,
    /// Input and output directory layout.
    pub paths: PathsConfig,
    /// Stylesheet bundling settings.
    pub css: CssConfig,
    /// Static asset copying settings.
    pub assets: AssetsConfig,
    /// Page assembly settings.
    pub html: HtmlConfig,
    /// Sitemap and robots.txt output.
    pub sitemap: SitemapConfig,
    /// Post-build link validation.
    pub links: LinksConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            paths: PathsConfig::default(),
            css: CssConfig::default(),
            assets: AssetsConfig::default(),
            html: HtmlConfig::default(),
            sitemap: SitemapConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if !(4..=64).contains(&self.css.hash_length) {
            return Err(ConfigError::Validation(
                "css.hash_length must be 4-64".into(),
            ));
        }
        if !self.css.entry.ends_with(".css") {
            return Err(ConfigError::Validation(
                "css.entry must be a .css file".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured relative paths against a project root.
    pub fn layout(&self, root: &Path) -> SiteLayout {
        let source = root.join(&self.paths.source);
        SiteLayout {
            pages_dir: source.join(&self.paths.pages),
            partials_dir: source.join(&self.paths.partials),
            assets_dir: source.join(&self.paths.assets),
            content_file: source.join(&self.paths.content),
            output_dir: root.join(&self.paths.output),
        }
    }
}

/// Concrete filesystem locations for one build, derived from [`PathsConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLayout {
    pub pages_dir: PathBuf,
    pub partials_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub content_file: PathBuf,
    pub output_dir: PathBuf,
}

impl SiteLayout {
    /// Directory holding the entry stylesheet and everything it imports.
    pub fn css_source_dir(&self) -> PathBuf {
        self.assets_dir.join("css")
    }

    /// Directory the hashed bundle is written to.
    pub fn css_output_dir(&self) -> PathBuf {
        self.output_dir.join("css")
    }
}

/// Input and output directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Source root, relative to the project root.
    pub source: String,
    /// Page shell directory, relative to `source`.
    pub pages: String,
    /// Partial fragment directory, relative to `source`.
    pub partials: String,
    /// Asset directory, relative to `source`.
    pub assets: String,
    /// Content JSON document, relative to `source`.
    pub content: String,
    /// Output root, relative to the project root. Wiped on every build.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src".to_string(),
            pages: "pages".to_string(),
            partials: "partials".to_string(),
            assets: "assets".to_string(),
            content: "content/content.json".to_string(),
            output: "dist".to_string(),
        }
    }
}

/// Stylesheet bundling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssConfig {
    /// Entry stylesheet file name under `assets/css/`.
    pub entry: String,
    /// Number of hex digits of the content hash embedded in the filename.
    pub hash_length: usize,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            entry: "styles.css".to_string(),
            hash_length: 8,
        }
    }
}

impl CssConfig {
    /// The unhashed stylesheet reference as authored in page shells.
    pub fn link_path(&self) -> String {
        format!("css/{}", self.entry)
    }
}

/// Static asset copying settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Subdirectories of the asset directory copied verbatim to the output root.
    pub copy: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            copy: vec!["js".to_string(), "img".to_string(), "icons".to_string()],
        }
    }
}

/// Page assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Path prefix used by internal authoring links, removed from every page.
    /// Empty disables stripping.
    pub strip_prefix: String,
    /// Minify the assembled pages.
    pub minify: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            strip_prefix: "pages/".to_string(),
            minify: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub enabled: bool,
    pub robots: bool,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            robots: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub validate: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { validate: true }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `site.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the given project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitebake Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Public URL of the deployed site. Used for sitemap.xml and robots.txt.
base_url = "https://example.com"

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[paths]
# Source root, relative to the project root.
source = "src"
# The following are relative to the source root.
pages = "pages"
partials = "partials"
assets = "assets"
content = "content/content.json"
# Output root, relative to the project root. Deleted and recreated on build.
output = "dist"

# ---------------------------------------------------------------------------
# Stylesheet bundle
# ---------------------------------------------------------------------------
[css]
# Entry stylesheet under <assets>/css/. Its @imports are inlined.
entry = "styles.css"
# Hex digits of the SHA-256 content hash in the bundle filename.
hash_length = 8

# ---------------------------------------------------------------------------
# Static assets
# ---------------------------------------------------------------------------
[assets]
# Subdirectories of <assets>/ copied verbatim into the output root.
copy = ["js", "img", "icons"]

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
[html]
# Prefix used by authoring links (e.g. href="pages/about.html"), removed
# from every built page. Set to "" to keep links untouched.
strip_prefix = "pages/"
minify = true

# ---------------------------------------------------------------------------
# Crawlers
# ---------------------------------------------------------------------------
[sitemap]
enabled = true
robots = true

# ---------------------------------------------------------------------------
# Diagnostics
# ---------------------------------------------------------------------------
[links]
# Warn about internal links that point to files missing from the output.
validate = true
"##
}
