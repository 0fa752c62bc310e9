//! Prose rewrite rules.
//!
//! Prose is handled one line at a time: the line is classified first (heading,
//! blockquote, list item, or plain text) on its raw form, then its remaining
//! text goes through the ordered inline rules. Line breaks are only turned
//! into `<br>` afterwards, so line anchors are never lost.

use std::sync::LazyLock;

use regex::Regex;

pub const H1_CLASS: &str = "text-3xl font-bold text-gray-900 mt-12 mb-8";
pub const H2_CLASS: &str = "text-2xl font-semibold text-gray-900 mt-10 mb-6";
pub const H3_CLASS: &str = "text-xl font-semibold text-gray-900 mt-8 mb-4";
pub const QUOTE_CLASS: &str = "border-l-4 border-blue-500 pl-4 italic text-gray-600 my-6";
pub const LIST_ITEM_CLASS: &str = "ml-4 mb-2";
pub const INLINE_CODE_CLASS: &str =
    "bg-gray-100 px-2 py-1 rounded text-sm font-mono text-gray-800 border";

/// Glyph prefixed to rendered list items.
pub const BULLET: &str = "• ";

/// A single text rewrite: every match of `pattern` becomes `replacement`.
#[derive(Debug)]
pub struct InlineRule {
    /// Rule name, used in debug output
    pub name: &'static str,
    pattern: Regex,
    replacement: String,
}

impl InlineRule {
    fn new(name: &'static str, pattern: &str, replacement: String) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("built-in inline pattern is valid"),
            replacement,
        }
    }

    /// Apply the rule to a single line of text.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// Inline rules in application order.
///
/// Bold must come before italic: the single-asterisk pattern would otherwise
/// split every `**` pair.
static INLINE_RULES: LazyLock<Vec<InlineRule>> = LazyLock::new(|| {
    vec![
        InlineRule::new(
            "bold",
            r"\*\*(.+?)\*\*",
            "<strong>$1</strong>".to_string(),
        ),
        InlineRule::new("italic", r"\*(.+?)\*", "<em>$1</em>".to_string()),
        InlineRule::new(
            "inline-code",
            r"`(.+?)`",
            format!(r#"<code class="{INLINE_CODE_CLASS}">$1</code>"#),
        ),
    ]
});

/// The inline rules, in the order they are applied.
pub fn inline_rules() -> &'static [InlineRule] {
    &INLINE_RULES
}

/// Run every inline rule over `text`, in order.
pub fn apply_inline(text: &str) -> String {
    inline_rules()
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Line-level structure recognised in prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `#`, `##` or `###` followed by a space
    Heading { level: u8, text: &'a str },
    /// `> ` prefix
    Quote(&'a str),
    /// `- ` or `* ` prefix
    ListItem(&'a str),
    /// Anything else, including `####` and deeper
    Plain(&'a str),
}

/// Classify a raw line by its leading marker.
pub fn classify_line(line: &str) -> LineKind<'_> {
    for (marker, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(text) = line.strip_prefix(marker) {
            return LineKind::Heading { level, text };
        }
    }

    if let Some(text) = line.strip_prefix("> ") {
        return LineKind::Quote(text);
    }

    if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return LineKind::ListItem(text);
    }

    LineKind::Plain(line)
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bold_applies_before_italic() {
        assert_eq!(
            apply_inline("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = inline_rules().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["bold", "italic", "inline-code"]);
    }

    #[test]
    fn renders_inline_code() {
        let html = apply_inline("call `run()` now");
        assert_eq!(
            html,
            format!(r#"call <code class="{INLINE_CODE_CLASS}">run()</code> now"#)
        );
    }

    #[test]
    fn leaves_unmatched_markers() {
        assert_eq!(apply_inline("a * b"), "a * b");
        assert_eq!(apply_inline("**"), "**");
        assert_eq!(apply_inline("`"), "`");
    }

    #[test]
    fn classifies_headings() {
        assert_eq!(
            classify_line("# Title"),
            LineKind::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            classify_line("## Title"),
            LineKind::Heading {
                level: 2,
                text: "Title"
            }
        );
        assert_eq!(
            classify_line("### Title"),
            LineKind::Heading {
                level: 3,
                text: "Title"
            }
        );
    }

    #[test]
    fn deep_or_unspaced_headings_are_plain() {
        assert_eq!(classify_line("#### Title"), LineKind::Plain("#### Title"));
        assert_eq!(classify_line("#Title"), LineKind::Plain("#Title"));
    }

    #[test]
    fn classifies_quotes_and_list_items() {
        assert_eq!(classify_line("> wise words"), LineKind::Quote("wise words"));
        assert_eq!(classify_line("- first"), LineKind::ListItem("first"));
        assert_eq!(classify_line("* second"), LineKind::ListItem("second"));
        assert_eq!(classify_line("-not a list"), LineKind::Plain("-not a list"));
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
