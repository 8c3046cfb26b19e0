//! Partial fragment loading.
//!
//! Every section of the site is authored as its own HTML file in the
//! partials directory. The set is fixed; each logical name maps to a file
//! by turning underscores into dashes (`about_step` → `about-step.html`).
//! All of them are read up front, and a single missing file fails the load
//! before any page is written.
//!
//! Loaded fragments are immutable templates. Injection reads them and
//! produces new strings; see [`crate::inject`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Logical names of every partial the site is composed from.
pub const PARTIAL_NAMES: &[&str] = &[
    "head",
    "header",
    "hero",
    "invoices",
    "about",
    "about_step",
    "services",
    "service_item",
    "contact",
    "footer",
];

#[derive(Error, Debug)]
pub enum PartialError {
    #[error("Partial '{name}' not found: {path}")]
    Missing { name: String, path: PathBuf },
    #[error("IO error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Unknown partial '{0}'")]
    Unknown(String),
}

/// File name for a logical partial name.
pub fn partial_file_name(name: &str) -> String {
    format!("{}.html", name.replace('_', "-"))
}

/// The loaded, read-only set of partial templates.
#[derive(Debug, Clone, Default)]
pub struct Partials {
    templates: BTreeMap<String, String>,
}

impl Partials {
    /// Load every name in [`PARTIAL_NAMES`] from `dir`.
    pub fn load(dir: &Path) -> Result<Self, PartialError> {
        Self::load_names(dir, PARTIAL_NAMES)
    }

    /// Load the given partials from `dir`; every one must exist.
    pub fn load_names(dir: &Path, names: &[&str]) -> Result<Self, PartialError> {
        let mut templates = BTreeMap::new();
        for name in names {
            let path = dir.join(partial_file_name(name));
            let html = fs::read_to_string(&path).map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    PartialError::Missing {
                        name: name.to_string(),
                        path: path.clone(),
                    }
                } else {
                    PartialError::Io {
                        path: path.clone(),
                        source,
                    }
                }
            })?;
            debug!(partial = name, bytes = html.len(), "loaded partial");
            templates.insert(name.to_string(), html);
        }
        Ok(Self { templates })
    }

    /// Build a set directly from in-memory templates.
    pub fn from_templates<I, K, V>(templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Template text for a logical name.
    pub fn get(&self, name: &str) -> Result<&str, PartialError> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PartialError::Unknown(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
