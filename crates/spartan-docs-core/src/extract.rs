//! Code block, heading, and link extraction from documentation HTML.
//!
//! Works on raw markup with tag-scanning patterns rather than a DOM tree;
//! inner content is converted through [`crate::text::to_plain_text`].

use crate::text::to_plain_text;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex for `<pre><code>` blocks.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static PRE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b[^>]*>\s*<code\b[^>]*>(.*?)</code>\s*</pre>").unwrap()
});

/// Regex for bare `<code>` blocks.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").unwrap());

/// Regex for `<h1>`-`<h3>` headings.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-3][^>]*>(.*?)</h[1-3]>").unwrap());

/// Regex for anchors with an href attribute.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

/// A hyperlink found in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Raw href attribute value.
    pub href: String,
    /// Plain-text link content.
    pub text: String,
}

/// Extracts code blocks from a page, `<pre><code>` blocks first, then bare
/// `<code>` blocks that were not already covered by a `<pre>` match.
///
/// Trivial snippets are filtered: single-line import statements, and
/// anything with two or fewer non-blank lines. The two passes are
/// concatenated in document order, not merged or re-sorted.
#[must_use]
pub fn extract_code_blocks(html: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut pre_spans: Vec<(usize, usize)> = Vec::new();

    for caps in PRE_CODE_RE.captures_iter(html) {
        // Capture 0 always exists on a match.
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            pre_spans.push((whole.start(), whole.end()));
            let text = to_plain_text(inner.as_str());
            if is_substantial_snippet(&text) {
                blocks.push(text);
            }
        }
    }

    for caps in CODE_RE.captures_iter(html) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            let covered = pre_spans
                .iter()
                .any(|&(start, end)| whole.start() >= start && whole.end() <= end);
            if covered {
                continue;
            }
            let text = to_plain_text(inner.as_str());
            if is_substantial_snippet(&text) {
                blocks.push(text);
            }
        }
    }

    blocks
}

/// Filter that keeps short unhelpful snippets (bare selectors, single import
/// lines) out of example lists.
fn is_substantial_snippet(text: &str) -> bool {
    let non_blank: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    if non_blank.len() == 1 && non_blank[0].contains("import") {
        return false;
    }

    non_blank.len() > 2
}

/// Extracts `<h1>`-`<h3>` heading texts in document order.
#[must_use]
pub fn extract_headings(html: &str) -> Vec<String> {
    HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|inner| to_plain_text(inner.as_str()))
        .collect()
}

/// Extracts `<a href="...">` links in document order.
#[must_use]
pub fn extract_links(html: &str) -> Vec<Link> {
    LINK_RE
        .captures_iter(html)
        .filter_map(|caps| match (caps.get(1), caps.get(2)) {
            (Some(href), Some(inner)) => Some(Link {
                href: href.as_str().to_string(),
                text: to_plain_text(inner.as_str()),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MULTILINE_SNIPPET: &str = "<pre><code>const a = 1;\nconst b = 2;\nconst c = 3;</code></pre>";

    #[test]
    fn test_pre_code_block_extracted() {
        let blocks = extract_code_blocks(MULTILINE_SNIPPET);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], "const a = 1;\nconst b = 2;\nconst c = 3;");
    }

    #[test]
    fn test_single_import_line_dropped() {
        let html = "<pre><code>import { BrnButton } from '@spartan-ng/brain';</code></pre>";
        assert!(extract_code_blocks(html).is_empty());
    }

    #[test]
    fn test_two_line_block_dropped() {
        let html = "<pre><code>line one\nline two</code></pre>";
        assert!(extract_code_blocks(html).is_empty());
    }

    #[test]
    fn test_three_line_block_retained() {
        let html = "<pre><code>one\ntwo\nthree</code></pre>";
        let blocks = extract_code_blocks(html);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_blank_lines_do_not_count() {
        let html = "<pre><code>one\n\n\ntwo</code></pre>";
        // Two non-blank lines: below the threshold.
        assert!(extract_code_blocks(html).is_empty());
    }

    #[test]
    fn test_bare_code_inside_pre_not_duplicated() {
        let blocks = extract_code_blocks(MULTILINE_SNIPPET);
        assert_eq!(blocks.len(), 1, "inner <code> must not be re-matched");
    }

    #[test]
    fn test_pre_blocks_ordered_before_bare_blocks() {
        let html = concat!(
            "<code>bare first\nbare second\nbare third</code>",
            "<pre><code>pre one\npre two\npre three</code></pre>",
        );
        let blocks = extract_code_blocks(html);
        assert_eq!(blocks.len(), 2);
        // The <pre><code> pass runs first even though the bare block appears
        // earlier in the document.
        assert!(blocks[0].starts_with("pre one"));
        assert!(blocks[1].starts_with("bare first"));
    }

    #[test]
    fn test_code_with_attributes() {
        let html = "<pre class=\"hljs\"><code class=\"language-ts\">a\nb\nc</code></pre>";
        assert_eq!(extract_code_blocks(html).len(), 1);
    }

    #[test]
    fn test_extract_headings_order_and_levels() {
        let html = concat!(
            "<h1>Dialog</h1>",
            "<h4>Too deep</h4>",
            "<h2 id=\"api\">Brain API</h2>",
            "<h3><span>BrnDialogTrigger</span></h3>",
        );
        let headings = extract_headings(html);
        assert_eq!(headings, vec!["Dialog", "Brain API", "BrnDialogTrigger"]);
    }

    #[test]
    fn test_extract_links() {
        let html = r#"<a href="/components/button" class="nav">Button docs</a>"#;
        let links = extract_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "/components/button");
        assert_eq!(links[0].text, "Button docs");
    }

    #[test]
    fn test_no_code_blocks_returns_empty() {
        assert!(extract_code_blocks("<p>prose only</p>").is_empty());
        assert!(extract_headings("<p>prose only</p>").is_empty());
        assert!(extract_links("<p>prose only</p>").is_empty());
    }
}
