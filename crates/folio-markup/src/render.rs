//! Markup to fragment rendering.

use serde::{Deserialize, Serialize};

use crate::codeblock::CodeFragment;
use crate::rules::{
    apply_inline, classify_line, escape_html, LineKind, BULLET, H1_CLASS, H2_CLASS, H3_CLASS,
    LIST_ITEM_CLASS, QUOTE_CLASS,
};
use crate::segment::{segment, Segment, UnterminatedFence};

/// Options controlling how markup is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RenderOptions {
    /// Escape `&`, `<`, `>` and `"` in prose before applying markup rules.
    /// Turn off only for fully trusted content that embeds raw HTML.
    #[serde(default = "default_true")]
    pub escape_html: bool,

    /// Policy for an opening fence with no closing fence
    #[serde(default)]
    pub unterminated_fence: UnterminatedFence,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape_html: true,
            unterminated_fence: UnterminatedFence::default(),
        }
    }
}

/// One classified line of prose, with its inline markup already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProseBlock {
    Heading { level: u8, html: String },
    Quote(String),
    ListItem(String),
    Line(String),
}

impl ProseBlock {
    /// Render this block as HTML.
    pub fn to_html(&self) -> String {
        match self {
            Self::Heading { level, html } => {
                let class = match level {
                    1 => H1_CLASS,
                    2 => H2_CLASS,
                    _ => H3_CLASS,
                };
                format!(r#"<h{level} class="{class}">{html}</h{level}>"#)
            }
            Self::Quote(html) => format!(r#"<blockquote class="{QUOTE_CLASS}">{html}</blockquote>"#),
            Self::ListItem(html) => format!(r#"<li class="{LIST_ITEM_CLASS}">{BULLET}{html}</li>"#),
            Self::Line(html) => html.clone(),
        }
    }

    /// Check if the line break after this block becomes a `<br>`.
    fn breaks_after(&self) -> bool {
        matches!(self, Self::Line(_))
    }
}

/// A rendered prose segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlFragment {
    /// Blocks in source order, one per source line
    pub blocks: Vec<ProseBlock>,
}

impl HtmlFragment {
    /// Concatenate the blocks into a single HTML string.
    ///
    /// Block elements absorb their own line break; plain lines are joined
    /// with `<br>`. No break follows the last line.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut iter = self.blocks.iter().peekable();

        while let Some(block) = iter.next() {
            out.push_str(&block.to_html());
            if iter.peek().is_some() && block.breaks_after() {
                out.push_str("<br>");
            }
        }

        out
    }

    /// Headings in this fragment as `(level, html)` pairs.
    pub fn headings(&self) -> impl Iterator<Item = (u8, &str)> {
        self.blocks.iter().filter_map(|b| match b {
            ProseBlock::Heading { level, html } => Some((*level, html.as_str())),
            _ => None,
        })
    }
}

/// One unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "WireFragment")]
pub enum Fragment {
    Html(HtmlFragment),
    Code(CodeFragment),
}

impl Fragment {
    /// Render this fragment as embeddable HTML.
    pub fn to_html(&self) -> String {
        match self {
            Self::Html(html) => html.to_html(),
            Self::Code(code) => code.to_html(),
        }
    }

    pub fn as_code(&self) -> Option<&CodeFragment> {
        match self {
            Self::Code(code) => Some(code),
            Self::Html(_) => None,
        }
    }

    pub fn as_html(&self) -> Option<&HtmlFragment> {
        match self {
            Self::Html(html) => Some(html),
            Self::Code(_) => None,
        }
    }
}

/// Serialized form of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireFragment {
    Html { value: String },
    Code { language: String, lines: Vec<String> },
}

impl From<Fragment> for WireFragment {
    fn from(fragment: Fragment) -> Self {
        match fragment {
            Fragment::Html(html) => Self::Html {
                value: html.to_html(),
            },
            Fragment::Code(code) => Self::Code {
                language: code.language,
                lines: code.lines,
            },
        }
    }
}

/// Render a content body into an ordered list of fragments.
///
/// Never fails: malformed markup degrades to visible stray markers.
pub fn render_markup(source: &str, options: &RenderOptions) -> Vec<Fragment> {
    segment(source, options.unterminated_fence)
        .into_iter()
        .map(|segment| match segment {
            Segment::Prose(text) => Fragment::Html(render_prose(&text, options)),
            Segment::Code { language, lines } => Fragment::Code(CodeFragment {
                language,
                lines: lines.into_iter().map(str::to_string).collect(),
            }),
        })
        .collect()
}

/// Render a prose segment line by line.
pub fn render_prose(text: &str, options: &RenderOptions) -> HtmlFragment {
    if text.is_empty() {
        return HtmlFragment::default();
    }

    let inline = |raw: &str| -> String {
        if options.escape_html {
            apply_inline(&escape_html(raw))
        } else {
            apply_inline(raw)
        }
    };

    let blocks = text
        .split('\n')
        .map(|line| match classify_line(line) {
            LineKind::Heading { level, text } => ProseBlock::Heading {
                level,
                html: inline(text),
            },
            LineKind::Quote(text) => ProseBlock::Quote(inline(text)),
            LineKind::ListItem(text) => ProseBlock::ListItem(inline(text)),
            LineKind::Plain(text) => ProseBlock::Line(inline(text)),
        })
        .collect();

    HtmlFragment { blocks }
}
