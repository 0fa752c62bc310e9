//! Fenced code segmentation.

use serde::Deserialize;

use crate::codeblock::language_from_info;

const FENCE: &str = "```";

/// What to do with an opening fence that is never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedFence {
    /// Everything from the opening fence to the end of the document is code
    #[default]
    Code,
    /// The stray fence line and everything after it stays prose
    Prose,
}

/// One piece of source text, either prose or a fenced code body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Free text; may be empty
    Prose(String),

    /// Literal lines between an opening and a closing fence
    Code {
        /// Language tag from the opening fence (`text` when absent)
        language: String,
        /// Body lines, verbatim
        lines: Vec<&'a str>,
    },
}

/// Opening fence: returns the info string after the backticks.
fn opening_fence(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(FENCE)
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Split `source` into alternating prose and code segments.
///
/// The result always starts and ends with a prose segment (possibly empty),
/// so `n` closed fences produce `2n + 1` segments.
pub fn segment(source: &str, policy: UnterminatedFence) -> Vec<Segment<'_>> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut segments = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        let Some(info) = opening_fence(line) else {
            prose.push(line);
            i += 1;
            continue;
        };

        let close = lines[i + 1..]
            .iter()
            .position(|l| is_closing_fence(l))
            .map(|offset| i + 1 + offset);

        let end = match (close, policy) {
            (Some(close), _) => close,
            (None, UnterminatedFence::Code) => {
                tracing::warn!(
                    "Unterminated code fence at line {}; rendering the rest as code",
                    i + 1
                );
                lines.len()
            }
            (None, UnterminatedFence::Prose) => {
                tracing::warn!(
                    "Unterminated code fence at line {}; keeping it as prose",
                    i + 1
                );
                prose.extend_from_slice(&lines[i..]);
                break;
            }
        };

        segments.push(Segment::Prose(prose.join("\n")));
        prose.clear();

        segments.push(Segment::Code {
            language: language_from_info(info.trim_end_matches('\r')),
            lines: lines[i + 1..end].to_vec(),
        });

        i = end + 1;
    }

    segments.push(Segment::Prose(prose.join("\n")));
    segments
}

/// Reassemble segments into markup that segments back to the same code bodies.
pub fn reassemble(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Prose(text) => text.clone(),
            Segment::Code { language, lines } => {
                let mut block = format!("{FENCE}{language}\n");
                for line in lines {
                    block.push_str(line);
                    block.push('\n');
                }
                block.push_str(FENCE);
                block
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
