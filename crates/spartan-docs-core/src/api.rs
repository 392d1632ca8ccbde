//! Section-scoped API extraction from component documentation pages.
//!
//! A page documents one library component and carries up to two named API
//! sections: "Brain API" for the unstyled `Brn*` primitives and "Helm API"
//! for the styled `Hlm*` ones. Extraction is scoped to those sections so
//! unrelated page content (navigation, footers, embedded JSON blobs) never
//! leaks into records.
//!
//! The boundary heuristics live in named functions (`section_between`,
//! `component_sections`, `parse_property_table`) so they stay independently
//! testable if the site's markup conventions drift.
//!
//! Extraction never fails: a missing section, heading, or table degrades to
//! an empty sequence. Callers must treat empty results as "not found", not
//! as an error.

use crate::extract::extract_code_blocks;
use crate::text::to_plain_text;
use crate::types::{ApiInput, ApiOutput, CodeExample, ComponentApiRecord, ExtractedApiInfo};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Maximum number of code examples kept per page, to bound output size.
pub const MAX_EXAMPLES: usize = 10;

/// Regex for headings of any level, used for section boundary detection.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ANY_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>").unwrap());

/// Regex for unstyled-tier primitive names in heading text.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static BRAIN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Brn[A-Z][A-Za-z0-9]*$").unwrap());

/// Regex for styled-tier primitive names in heading text.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static HELM_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Hlm[A-Z][A-Za-z0-9]*$").unwrap());

/// Regex for a `Selector: <value>` line in subsection plain text.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Selector:[ \t]*([^\n]+)").unwrap());

/// Regex for `<table>` elements.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").unwrap());

/// Regex for table rows.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap());

/// Regex for table cells (`<td>` or `<th>`).
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").unwrap());

/// A heading occurrence with its byte span in the source HTML.
#[derive(Debug, Clone)]
struct HeadingSpan {
    text: String,
    start: usize,
    end: usize,
}

fn heading_spans(html: &str) -> Vec<HeadingSpan> {
    ANY_HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(inner)) => Some(HeadingSpan {
                text: to_plain_text(inner.as_str()),
                start: whole.start(),
                end: whole.end(),
            }),
            _ => None,
        })
        .collect()
}

/// Returns the slice of `html` beginning at the first heading whose text is
/// exactly `start_heading` and ending just before the next heading whose
/// text is one of `end_headings` (or at end of document).
///
/// `None` means the start heading does not exist, which callers must treat
/// as "section not present", never as a failure.
#[must_use]
pub fn section_between<'a>(
    html: &'a str,
    start_heading: &str,
    end_headings: &[&str],
) -> Option<&'a str> {
    let headings = heading_spans(html);
    let start_idx = headings.iter().position(|h| h.text == start_heading)?;
    let start = headings[start_idx].start;

    let end = headings[start_idx + 1..]
        .iter()
        .find(|h| end_headings.contains(&h.text.as_str()))
        .map_or(html.len(), |h| h.start);

    Some(&html[start..end])
}

/// Splits a section into component subsections.
///
/// Every heading whose text matches the tier's name pattern starts a new
/// subsection running until the next matching heading or the section end.
/// Returns `(name, subsection_html)` pairs in document order.
#[must_use]
pub fn component_sections<'a>(section: &'a str, name_pattern: &Regex) -> Vec<(String, &'a str)> {
    let headings: Vec<HeadingSpan> = heading_spans(section)
        .into_iter()
        .filter(|h| name_pattern.is_match(&h.text))
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let end = headings
                .get(i + 1)
                .map_or(section.len(), |next| next.start);
            (h.text.clone(), &section[h.end..end])
        })
        .collect()
}

/// Parses a property table into rows of exactly `columns` cell texts.
///
/// The first row is skipped as the header. Rows with fewer than
/// `columns - 1` usable cells are skipped entirely (the tolerant fallback
/// for malformed/merged rows); a missing final cell yields an empty string.
/// Cells beyond `columns` are ignored.
#[must_use]
pub fn parse_property_table(table_html: &str, columns: usize) -> Vec<Vec<String>> {
    ROW_RE
        .captures_iter(table_html)
        .skip(1)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter_map(|row| {
            let mut cells: Vec<String> = CELL_RE
                .captures_iter(row)
                .filter_map(|caps| caps.get(1))
                .take(columns)
                .map(|m| to_plain_text(m.as_str()))
                .collect();

            if cells.len() + 1 < columns {
                return None;
            }
            cells.resize(columns, String::new());
            Some(cells)
        })
        .collect()
}

/// Extracts the subsection between a heading literally named `title` and the
/// next heading of any level (or the end of the slice).
fn titled_subsection<'a>(html: &'a str, title: &str) -> Option<&'a str> {
    let headings = heading_spans(html);
    let idx = headings.iter().position(|h| h.text == title)?;
    let start = headings[idx].end;
    let end = headings
        .get(idx + 1)
        .map_or(html.len(), |next| next.start);
    Some(&html[start..end])
}

fn parse_selector(subsection: &str) -> String {
    let text = to_plain_text(subsection);
    SELECTOR_RE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn parse_inputs(subsection: &str) -> Vec<ApiInput> {
    let Some(scope) = titled_subsection(subsection, "Inputs") else {
        return Vec::new();
    };
    let Some(table) = TABLE_RE.find(scope) else {
        return Vec::new();
    };

    parse_property_table(table.as_str(), 4)
        .into_iter()
        .map(|mut cells| {
            let description = cells.pop().unwrap_or_default();
            let default = cells.pop().unwrap_or_default();
            let type_name = cells.pop().unwrap_or_default();
            let prop = cells.pop().unwrap_or_default();
            ApiInput {
                prop,
                type_name,
                default,
                description,
            }
        })
        .collect()
}

fn parse_outputs(subsection: &str) -> Vec<ApiOutput> {
    let Some(scope) = titled_subsection(subsection, "Outputs") else {
        return Vec::new();
    };
    let Some(table) = TABLE_RE.find(scope) else {
        return Vec::new();
    };

    parse_property_table(table.as_str(), 3)
        .into_iter()
        .map(|mut cells| {
            let description = cells.pop().unwrap_or_default();
            let type_name = cells.pop().unwrap_or_default();
            let prop = cells.pop().unwrap_or_default();
            ApiOutput {
                prop,
                type_name,
                description,
            }
        })
        .collect()
}

fn parse_section(section: &str, name_pattern: &Regex) -> Vec<ComponentApiRecord> {
    component_sections(section, name_pattern)
        .into_iter()
        .map(|(name, subsection)| ComponentApiRecord {
            name,
            selector: parse_selector(subsection),
            inputs: parse_inputs(subsection),
            outputs: parse_outputs(subsection),
        })
        .collect()
}

/// Guesses the language of a code example with substring heuristics.
fn guess_language(code: &str) -> &'static str {
    if code.contains("import") && code.contains("Component") {
        "typescript"
    } else if code.contains("import") && code.contains("from") {
        "javascript"
    } else if code.contains('<') && code.contains('>') && code.contains("hlm") {
        "html"
    } else if code.contains("npm") || code.contains("npx") || code.contains("ng ") {
        "bash"
    } else {
        "typescript"
    }
}

/// Extracts structured API data and code examples from a documentation page.
///
/// The "Brain API" section runs until the next "Helm API" / "On this page"
/// heading, and symmetrically for "Helm API". A page without either section
/// yields empty record lists; this is the expected shape for guide pages
/// and is not an error. Examples are taken from the whole page, capped at
/// [`MAX_EXAMPLES`].
#[must_use]
pub fn extract_api_info(html: &str) -> ExtractedApiInfo {
    let brain_api = section_between(html, "Brain API", &["Helm API", "On this page"])
        .map(|section| parse_section(section, &BRAIN_NAME_RE))
        .unwrap_or_default();

    let helm_api = section_between(html, "Helm API", &["Brain API", "On this page"])
        .map(|section| parse_section(section, &HELM_NAME_RE))
        .unwrap_or_default();

    let examples: Vec<CodeExample> = extract_code_blocks(html)
        .into_iter()
        .take(MAX_EXAMPLES)
        .enumerate()
        .map(|(i, code)| CodeExample {
            title: format!("Example {}", i + 1),
            language: guess_language(&code).to_string(),
            code,
        })
        .collect();

    debug!(
        brain = brain_api.len(),
        helm = helm_api.len(),
        examples = examples.len(),
        "extracted API info"
    );

    ExtractedApiInfo {
        brain_api,
        helm_api,
        examples,
    }
}
