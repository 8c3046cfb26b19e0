//! The site content document.
//!
//! All copy on the site lives in one JSON file with a fixed shape:
//!
//! ```json
//! {
//!   "header":   { "nav": [{ "label": "About", "link": "#about" }] },
//!   "hero":     { "title": "...", "description": "...", "cta": "..." },
//!   "invoices": { "label": "Paid", "amounts": ["$1,200", 840] },
//!   "about":    { "title": "...", "description": "...",
//!                 "steps": [{ "title": "...", "description": "..." }] },
//!   "services": { "title": "...", "description": "...",
//!                 "list": [{ "title": "...", "description": "..." }] },
//!   "contact":  { "title": "...", "description": "..." }
//! }
//! ```
//!
//! Every field is required. A document missing any of them fails to load,
//! so injection never runs against partial content.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content document not found: {0}")]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid content document {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub header: Header,
    pub hero: Hero,
    pub invoices: Invoices,
    pub about: About,
    pub services: Services,
    pub contact: Contact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub nav: Vec<NavLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hero {
    pub title: String,
    pub description: String,
    pub cta: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoices {
    pub label: String,
    pub amounts: Vec<Amount>,
}

/// An invoice amount, authored either as display text or a bare number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(s) => f.write_str(s),
            Amount::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct About {
    pub title: String,
    pub description: String,
    pub steps: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Services {
    pub title: String,
    pub description: String,
    pub list: Vec<Entry>,
}

/// A titled item in a list section (about steps, services).
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub title: String,
    pub description: String,
}

impl Content {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Read and parse the content document at `path`.
pub fn load_content(path: &Path) -> Result<Content, ContentError> {
    let json = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ContentError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    Content::from_json(&json).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}
