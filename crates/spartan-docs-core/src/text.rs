//! Best-effort HTML to plain-text conversion.
//!
//! This is deliberately not a standards-compliant HTML transform: the goal is
//! readable plain text with paragraph breaks, good enough for documentation
//! pages. Callers must not depend on exact whitespace fidelity.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for `<script>` blocks, including their content.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());

/// Regex for `<style>` blocks, including their content.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());

/// Regex for closing tags of block-level elements.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static BLOCK_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|section|article|h[1-6]|li|ul|ol|table|tr|blockquote|pre)>")
        .unwrap()
});

/// Regex for explicit line breaks and horizontal rules.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:br|hr)\s*/?>").unwrap());

/// Regex for any remaining tag.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

/// Regex for runs of three or more newlines.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts an HTML fragment into readable plain text.
///
/// `<script>` and `<style>` blocks are removed entirely before any other
/// processing, so their content never leaks into the output. Block-level
/// closing tags, `<br>`, and `<hr>` become newlines so the visual structure
/// survives tag stripping. Only the fixed entity set
/// `&nbsp; &amp; &lt; &gt; &quot; &#39;` is decoded; anything else is left
/// verbatim. Runs of three or more newlines collapse to exactly two.
#[must_use]
pub fn to_plain_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");

    let with_breaks = BLOCK_CLOSE_RE.replace_all(&without_styles, "\n");
    let with_breaks = LINE_BREAK_RE.replace_all(&with_breaks, "\n");

    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);

    let collapsed = NEWLINE_RUN_RE.replace_all(&decoded, "\n\n");
    collapsed.trim().to_string()
}

/// Decodes the fixed entity set in a single pass.
///
/// `&amp;` is handled last so that a literal `&amp;lt;` decodes to `&lt;`
/// rather than `<`.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_simple_tags() {
        let html = "<p>Hello <strong>world</strong></p>";
        assert_eq!(to_plain_text(html), "Hello world");
    }

    #[test]
    fn test_script_content_never_leaks() {
        let html = "<p>before</p><script>var SECRET = 'leak-me';</script><p>after</p>";
        let text = to_plain_text(html);
        assert!(!text.contains("SECRET"));
        assert!(!text.contains("leak-me"));
        assert!(text.contains("before"));
        assert!(text.contains("after"));
    }

    #[test]
    fn test_style_content_never_leaks() {
        let html = "<style>.hidden { display: none; }</style><div>visible</div>";
        let text = to_plain_text(html);
        assert!(!text.contains("display"));
        assert!(!text.contains("hidden"));
        assert!(text.contains("visible"));
    }

    #[test]
    fn test_multiline_script_with_attributes() {
        let html = "<script type=\"module\" defer>\nconst a = 1;\nconst b = 2;\n</script>ok";
        assert_eq!(to_plain_text(html), "ok");
    }

    #[test]
    fn test_block_tags_become_paragraph_breaks() {
        let html = "<h1>Title</h1><p>First paragraph.</p><p>Second paragraph.</p>";
        let text = to_plain_text(html);
        assert_eq!(text, "Title\nFirst paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_br_and_hr_become_newlines() {
        let html = "line one<br>line two<hr/>line three<br />line four";
        let text = to_plain_text(html);
        assert_eq!(text, "line one\nline two\nline three\nline four");
    }

    #[test]
    fn test_entity_decoding_fixed_set() {
        let html = "a&nbsp;b &amp; c &lt;tag&gt; &quot;q&quot; it&#39;s";
        assert_eq!(to_plain_text(html), "a b & c <tag> \"q\" it's");
    }

    #[test]
    fn test_unrecognized_entities_left_verbatim() {
        let html = "copyright &copy; 2024 &mdash; fin";
        let text = to_plain_text(html);
        assert!(text.contains("&copy;"));
        assert!(text.contains("&mdash;"));
    }

    #[test]
    fn test_double_escaped_ampersand_decodes_once() {
        // Single-pass semantics: "&amp;lt;" is an escaped "&lt;", not a "<".
        assert_eq!(to_plain_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_newline_runs_collapse_to_two() {
        let html = "<p>one</p><div></div><div></div><div></div><p>two</p>";
        let text = to_plain_text(html);
        assert!(!text.contains("\n\n\n"));
        assert_eq!(text, "one\n\ntwo");
    }

    #[test]
    fn test_output_is_trimmed() {
        let html = "  <p>  content  </p>  ";
        let text = to_plain_text(html);
        assert!(!text.starts_with(char::is_whitespace));
        assert!(!text.ends_with(char::is_whitespace));
    }

    #[test]
    fn test_empty_and_tag_only_input() {
        assert_eq!(to_plain_text(""), "");
        assert_eq!(to_plain_text("<div><span></span></div>"), "");
    }

    proptest! {
        #[test]
        fn test_script_bodies_never_survive(body in "[a-zA-Z0-9 ]{1,40}") {
            let marker = format!("XSCRIPTX{body}");
            let html = format!("<p>keep</p><script>{marker}</script>");
            let text = to_plain_text(&html);
            prop_assert!(!text.contains("XSCRIPTX"));
        }

        #[test]
        fn test_never_more_than_two_consecutive_newlines(html in r"[a-z\n </>phr1]{0,200}") {
            let text = to_plain_text(&html);
            prop_assert!(!text.contains("\n\n\n"));
        }
    }
}
