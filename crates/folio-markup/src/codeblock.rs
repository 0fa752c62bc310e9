//! Code fragment model and display rendering.

use crate::highlight::highlight_lines;
use crate::rules::escape_html;

/// Language tag used when a fence carries no info string.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Parse the language tag from a code fence info string.
///
/// Only the first whitespace-separated token counts; anything after it
/// (`kotlin title="x"`) is ignored.
pub fn language_from_info(info: &str) -> String {
    info.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// A literal code block ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    /// Language label shown in the block header
    pub language: String,

    /// Source lines, verbatim, without line terminators
    pub lines: Vec<String>,
}

impl CodeFragment {
    /// Create a code fragment from a language tag and a literal body.
    pub fn new(language: impl Into<String>, body: &str) -> Self {
        let lines = if body.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(str::to_string).collect()
        };

        Self {
            language: language.into(),
            lines,
        }
    }

    /// The literal body exactly as it appeared between the fences.
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }

    /// Lines paired with their zero-padded, 1-based line number.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (String, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line_number(i + 1), line.as_str()))
    }

    /// Render the block header, copy button, and numbered lines as HTML.
    ///
    /// Line spans are emitted back to back: each `.code-line` is a block of
    /// its own, and any text between them would render inside the `<pre>`.
    pub fn to_html(&self) -> String {
        let language = escape_html(&self.language);
        let mut out = format!(
            r#"<div class="code-block" data-language="{language}"><div class="code-header"><span class="code-language">{language}</span><button type="button" class="copy-btn">Copy</button></div><pre><code class="language-{language}">"#
        );

        let highlighted = highlight_lines(&self.language, &self.lines);

        for (i, (number, line)) in self.numbered_lines().enumerate() {
            let content = match highlighted.as_ref().and_then(|h| h.get(i)) {
                Some(html) => html.clone(),
                None => escape_html(line),
            };
            out.push_str(&format!(
                r#"<span class="code-line"><span class="line-number">{}</span><span class="line-content">{}</span></span>"#,
                number, content
            ));
        }

        out.push_str("</code></pre></div>");
        out
    }
}

/// Format a 1-based line number, padded to at least two digits.
fn line_number(n: usize) -> String {
    format!("{:02}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_language() {
        assert_eq!(language_from_info("kotlin"), "kotlin");
        assert_eq!(language_from_info("  bash  "), "bash");
        assert_eq!(language_from_info("ts title=\"x.ts\""), "ts");
        assert_eq!(language_from_info(""), "text");
    }

    #[test]
    fn numbers_lines_with_padding() {
        let block = CodeFragment::new("kotlin", "a\nb\nc");
        let numbers: Vec<_> = block.numbered_lines().map(|(n, _)| n).collect();

        assert_eq!(numbers, vec!["01", "02", "03"]);
    }

    #[test]
    fn pads_past_two_digits_without_truncating() {
        let body = vec!["x"; 100].join("\n");
        let block = CodeFragment::new("text", &body);
        let last = block.numbered_lines().last().unwrap().0;

        assert_eq!(last, "100");
    }

    #[test]
    fn preserves_source_exactly() {
        let body = "fun main() {\n    println(\"hi\")\n}";
        let block = CodeFragment::new("kotlin", body);

        assert_eq!(block.source(), body);
        assert_eq!(block.lines.len(), 3);
    }

    #[test]
    fn empty_body_has_no_lines() {
        let block = CodeFragment::new("text", "");
        assert!(block.lines.is_empty());
        assert_eq!(block.source(), "");
    }

    #[test]
    fn lines_are_adjacent_inside_pre() {
        let html = CodeFragment::new("text", "a\nb\nc").to_html();

        assert_eq!(html.matches(r#"<span class="code-line">"#).count(), 3);
        assert!(!html.contains('\n'));
        assert!(html.contains(r#"</span></span><span class="code-line">"#));
        assert!(html.ends_with("</span></span></code></pre></div>"));
    }

    #[test]
    fn highlights_kotlin_without_touching_source() {
        let body = "val greeting = \"hi\" // say hi\nprintln(greeting)";
        let block = CodeFragment::new("kotlin", body);
        let html = block.to_html();

        assert!(html.contains(r#"<span class="line-content"><span class="hl-"#));
        assert!(html.contains("hl-comment"));
        assert!(!html.contains('\n'));
        assert_eq!(block.source(), body);
    }

    #[test]
    fn plain_text_lines_are_escaped_not_highlighted() {
        let html = CodeFragment::new("text", "x < y").to_html();

        assert!(html.contains(r#"<span class="line-content">x &lt; y</span>"#));
        assert!(!html.contains("hl-"));
    }

    #[test]
    fn highlighted_markup_stays_escaped() {
        let block = CodeFragment::new("html", "<b>&</b>");
        let html = block.to_html();

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;"));
        assert_eq!(block.source(), "<b>&</b>");
    }

    #[test]
    fn escapes_code_for_display_only() {
        let block = CodeFragment::new("text", "<b>&</b>");
        let html = block.to_html();

        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(html.contains(r#"<span class="line-number">01</span>"#));
        assert!(html.contains(r#"class="language-text""#));
        assert!(html.contains(r#"<button type="button" class="copy-btn">Copy</button>"#));
        assert_eq!(block.source(), "<b>&</b>");
    }
}
