//! Syntax highlighting for code fragments.
//!
//! Highlighting emits class-based spans (`hl-` prefixed scope names) so the
//! colors live in the stylesheet from [`theme_css`]. Output is split back into
//! one balanced HTML string per source line, keeping line numbering intact.

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::codeblock::DEFAULT_LANGUAGE;

/// Prefix on every highlight class.
pub const CLASS_PREFIX: &str = "hl-";

/// Theme the stylesheet is generated from.
pub const THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

fn class_style() -> ClassStyle {
    ClassStyle::SpacedPrefixed {
        prefix: CLASS_PREFIX,
    }
}

/// Map a fence language tag onto a bundled grammar.
///
/// Kotlin and TypeScript have no bundled grammar and borrow the closest one.
fn syntax_for(language: &str) -> Option<&'static SyntaxReference> {
    let language = language.to_ascii_lowercase();
    if language == DEFAULT_LANGUAGE {
        return None;
    }

    let token = match language.as_str() {
        "kotlin" | "kt" | "kts" => "java",
        "typescript" | "ts" | "tsx" | "jsx" | "javascript" => "js",
        "shell" | "sh" | "zsh" => "bash",
        "py" => "python",
        other => other,
    };

    SYNTAX_SET.find_syntax_by_token(token)
}

/// Highlight `lines` as `language`, one HTML string per line.
///
/// Returns `None` for unknown languages or when the grammar fails, in which
/// case callers fall back to plain escaped text.
pub fn highlight_lines(language: &str, lines: &[String]) -> Option<Vec<String>> {
    let syntax = syntax_for(language)?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, class_style());

    for line in lines {
        let line = format!("{}\n", line);
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(&line) {
            tracing::debug!("Highlighting {} failed: {}", language, e);
            return None;
        }
    }

    Some(split_balanced(&generator.finalize(), lines.len()))
}

/// Split highlighted HTML at newlines, reopening spans that cross a line.
fn split_balanced(html: &str, count: usize) -> Vec<String> {
    let mut open: Vec<&str> = Vec::new();

    html.split('\n')
        .take(count)
        .map(|part| {
            let mut line = open.concat();
            line.push_str(part);
            track_spans(part, &mut open);
            for _ in &open {
                line.push_str("</span>");
            }
            line
        })
        .collect()
}

/// Update the open-span stack with the tags in `html`.
///
/// Text from the generator is escaped, so every `<` starts a tag.
fn track_spans<'a>(html: &'a str, open: &mut Vec<&'a str>) {
    let mut rest = html;

    while let Some(i) = rest.find('<') {
        rest = &rest[i..];
        if let Some(after) = rest.strip_prefix("</span>") {
            open.pop();
            rest = after;
        } else if rest.starts_with("<span") {
            let end = rest.find('>').map_or(rest.len(), |e| e + 1);
            open.push(&rest[..end]);
            rest = &rest[end..];
        } else {
            rest = &rest[1..];
        }
    }
}

/// Stylesheet for the highlight classes.
pub fn theme_css() -> String {
    let themes = ThemeSet::load_defaults();
    let Some(theme) = themes.themes.get(THEME) else {
        tracing::warn!("Highlight theme {} not found", THEME);
        return String::new();
    };

    css_for_theme_with_class_style(theme, class_style()).unwrap_or_else(|e| {
        tracing::warn!("Failed to generate highlight CSS: {}", e);
        String::new()
    })
}
