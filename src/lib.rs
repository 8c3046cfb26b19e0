//! # sitebake
//!
//! A static-site build pipeline. HTML partials, one JSON content document
//! and a tree of CSS sources go in; a minified, cache-busted site with a
//! sitemap and robots file comes out.
//!
//! # Architecture: Sequential Pipeline
//!
//! A build is a one-shot batch transform. Every stage runs to completion,
//! writes included, before the next begins:
//!
//! ```text
//! 1. Prepare    dist/ wiped and recreated
//! 2. Bundle     assets/css/styles.css  →  dist/css/styles.<hash>.css
//! 3. Copy       assets/{js,img,icons}  →  dist/{js,img,icons}
//! 4. Inject     partials/ + content.json  →  resolved sections
//! 5. Assemble   pages/*.html + sections  →  dist/*.html (minified)
//! 6. Crawlers   dist/*.html  →  dist/sitemap.xml, dist/robots.txt
//! 7. Validate   dist/**/*.html  →  warnings for broken internal links
//! 8. Report     dist/**  →  per-file sizes
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Runs the stages in order and collects a [`pipeline::BuildReport`] |
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`css`] | `@import` inlining with a seen-set, minification, content hashing |
//! | [`assets`] | Recursive copy of static asset folders |
//! | [`content`] | Typed content document (`content.json`) |
//! | [`partials`] | Eager loading of the named HTML fragments |
//! | [`inject`] | Placeholder substitution and fragment embedding |
//! | [`page`] | Page shell assembly and HTML minification |
//! | [`sitemap`] | `sitemap.xml` and `robots.txt` |
//! | [`links`] | Post-build internal link validation |
//! | [`output`] | CLI output formatting and the size report |
//!
//! # Design Decisions
//!
//! ## Literal Placeholders, Not a Template Language
//!
//! Partials carry `{{section.field}}` value markers and `<!-- name -->`
//! embedding markers. There are no loops, conditionals or expressions to
//! parse: repetition comes from the content lists themselves, one
//! substitution per marker occurrence. Anyone who can edit HTML can edit a
//! partial.
//!
//! ## Immutable Fragments
//!
//! Partials are loaded once and never modified. Injection computes new
//! strings and pages are composed from explicit resolved sections, so a
//! fragment embedded in two places can never pick up a substitution meant
//! for the other.
//!
//! ## Content-Hashed Stylesheet
//!
//! The bundle name carries a SHA-256 prefix of its minified bytes. Changing
//! any rule changes the URL; rebuilding unchanged sources reproduces the
//! exact same file name and bytes.
//!
//! ## Warnings Over Failures
//!
//! Only missing inputs the site cannot exist without (page shells,
//! partials, content, entry stylesheet) abort a build. A missing imported
//! stylesheet, asset folder or link target is logged and the build
//! continues.

pub mod assets;
pub mod config;
pub mod content;
pub mod css;
pub mod inject;
pub mod links;
pub mod output;
pub mod page;
pub mod partials;
pub mod pipeline;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_helpers;
