//! Content injection into partial templates.
//!
//! Stage 4 of the build. Turns the immutable partial templates plus the
//! content document into fully resolved section fragments ([`Sections`]).
//!
//! ## Placeholders
//!
//! - `{{section.field}}`: a value marker. Single values replace the first
//!   occurrence. List values replace one occurrence per item, in list order;
//!   surplus items are dropped and surplus markers stay in place.
//! - `<!-- name -->`: an embedding point where a resolved child fragment is
//!   inserted into its parent.
//!
//! ## Resolution Order
//!
//! Children are always resolved completely before they are embedded, so a
//! parent never receives a fragment that still carries its own markers:
//!
//! ```text
//! invoices ──(label, amounts)──▶ embedded into hero at <!-- invoices -->
//! about_step × steps ──────────▶ embedded into about at <!-- about-steps -->
//! service_item × list ─────────▶ embedded into services at <!-- services-list -->
//! ```
//!
//! Every function here returns a new string; templates are never mutated.
//! Each substitution is a single left-to-right pass over the template, so a
//! value that happens to contain marker text is never re-substituted.

use crate::content::{Content, Entry};
use crate::partials::{PartialError, Partials};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*[A-Za-z0-9_.]+\s*\}\}").expect("valid regex"));

/// Embedding point for the invoices fragment inside the hero.
pub const INVOICES_MARKER: &str = "<!-- invoices -->";
/// Embedding point for the rendered steps inside the about section.
pub const ABOUT_STEPS_MARKER: &str = "<!-- about-steps -->";
/// Embedding point for the rendered service items inside the services section.
pub const SERVICES_LIST_MARKER: &str = "<!-- services-list -->";

/// Fully resolved section fragments, ready to be placed into page shells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sections {
    pub head: String,
    pub header: String,
    pub hero: String,
    pub about: String,
    pub services: String,
    pub contact: String,
    pub footer: String,
}

// ============================================================================
// Substitution primitives
// ============================================================================

/// Replace the first occurrence of `marker` with `value`.
pub fn fill_first(template: &str, marker: &str, value: &str) -> String {
    fill_each(template, marker, &[value])
}

/// Replace successive occurrences of `marker` with successive `values`.
///
/// Stops at whichever runs out first: extra values are dropped, extra
/// markers are left untouched.
pub fn fill_each<S: AsRef<str>>(template: &str, marker: &str, values: &[S]) -> String {
    if marker.is_empty() {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;
    while let Some(pos) = rest.find(marker) {
        let Some(value) = values.next() else { break };
        out.push_str(&rest[..pos]);
        out.push_str(value.as_ref());
        rest = &rest[pos + marker.len()..];
    }
    out.push_str(rest);
    out
}

/// Fill several parallel marker columns from rows of values.
///
/// `markers[i]` is filled with `row[i]` of each row, in row order. Used for
/// repeated marker groups such as a nav entry's label and link.
pub fn fill_rows<S: AsRef<str>>(template: &str, markers: &[&str], rows: &[Vec<S>]) -> String {
    markers
        .iter()
        .enumerate()
        .fold(template.to_string(), |html, (col, marker)| {
            let column: Vec<&str> = rows
                .iter()
                .filter_map(|row| row.get(col).map(AsRef::as_ref))
                .collect();
            fill_each(&html, marker, &column)
        })
}

/// Replace the embedding `marker` in `parent` with the resolved `child`.
pub fn embed(parent: &str, marker: &str, child: &str) -> String {
    fill_first(parent, marker, child)
}

/// Number of occurrences of `marker` in `template`.
pub fn count_markers(template: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }
    template.matches(marker).count()
}

/// Every `{{...}}` value marker still present in `html`.
pub fn unresolved_placeholders(html: &str) -> Vec<String> {
    PLACEHOLDER
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ============================================================================
// Section renderers
// ============================================================================

/// Warn when a list has more items than its template has markers for.
fn check_capacity(section: &str, template: &str, marker: &str, items: usize) {
    let slots = count_markers(template, marker);
    if items > slots {
        warn!(
            section,
            marker,
            items,
            slots,
            dropped = items - slots,
            "more content items than placeholders, extra items dropped"
        );
    }
}

/// Render `template` once per entry and concatenate the results.
fn render_entries(template: &str, prefix: &str, entries: &[Entry]) -> String {
    let number_marker = format!("{{{{{prefix}.number}}}}");
    let title_marker = format!("{{{{{prefix}.title}}}}");
    let description_marker = format!("{{{{{prefix}.description}}}}");

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let html = fill_first(template, &number_marker, &(i + 1).to_string());
            let html = fill_first(&html, &title_marker, &entry.title);
            fill_first(&html, &description_marker, &entry.description)
        })
        .collect()
}

/// Header: one `{{nav.label}}`/`{{nav.link}}` pair per nav entry.
pub fn render_header(template: &str, content: &Content) -> String {
    let nav = &content.header.nav;
    check_capacity("header", template, "{{nav.label}}", nav.len());
    let rows: Vec<Vec<&str>> = nav
        .iter()
        .map(|item| vec![item.label.as_str(), item.link.as_str()])
        .collect();
    fill_rows(template, &["{{nav.label}}", "{{nav.link}}"], &rows)
}

/// Invoices: the label, then one `{{invoices.amount}}` per amount.
pub fn render_invoices(template: &str, content: &Content) -> String {
    let invoices = &content.invoices;
    let html = fill_first(template, "{{invoices.label}}", &invoices.label);
    check_capacity("invoices", &html, "{{invoices.amount}}", invoices.amounts.len());
    let amounts: Vec<String> = invoices.amounts.iter().map(ToString::to_string).collect();
    fill_each(&html, "{{invoices.amount}}", &amounts)
}

/// Hero: its own fields plus the resolved invoices fragment.
pub fn render_hero(template: &str, invoices: &str, content: &Content) -> String {
    let hero = &content.hero;
    let html = fill_first(template, "{{hero.title}}", &hero.title);
    let html = fill_first(&html, "{{hero.description}}", &hero.description);
    let html = fill_first(&html, "{{hero.cta}}", &hero.cta);
    embed(&html, INVOICES_MARKER, invoices)
}

/// About: title, description, and one rendered step per entry.
pub fn render_about(template: &str, step_template: &str, content: &Content) -> String {
    let about = &content.about;
    let steps = render_entries(step_template, "step", &about.steps);
    let html = fill_first(template, "{{about.title}}", &about.title);
    let html = fill_first(&html, "{{about.description}}", &about.description);
    embed(&html, ABOUT_STEPS_MARKER, &steps)
}

/// Services: title, description, and one rendered item per entry.
pub fn render_services(template: &str, item_template: &str, content: &Content) -> String {
    let services = &content.services;
    let items = render_entries(item_template, "service", &services.list);
    let html = fill_first(template, "{{services.title}}", &services.title);
    let html = fill_first(&html, "{{services.description}}", &services.description);
    embed(&html, SERVICES_LIST_MARKER, &items)
}

pub fn render_contact(template: &str, content: &Content) -> String {
    let contact = &content.contact;
    let html = fill_first(template, "{{contact.title}}", &contact.title);
    fill_first(&html, "{{contact.description}}", &contact.description)
}

/// Resolve every section from the partial templates and the content.
pub fn render_sections(partials: &Partials, content: &Content) -> Result<Sections, PartialError> {
    let invoices = render_invoices(partials.get("invoices")?, content);

    let sections = Sections {
        head: partials.get("head")?.to_string(),
        header: render_header(partials.get("header")?, content),
        hero: render_hero(partials.get("hero")?, &invoices, content),
        about: render_about(partials.get("about")?, partials.get("about_step")?, content),
        services: render_services(
            partials.get("services")?,
            partials.get("service_item")?,
            content,
        ),
        contact: render_contact(partials.get("contact")?, content),
        footer: partials.get("footer")?.to_string(),
    };

    debug!(
        header = sections.header.len(),
        hero = sections.hero.len(),
        about = sections.about.len(),
        services = sections.services.len(),
        "sections resolved"
    );
    Ok(sections)
}
