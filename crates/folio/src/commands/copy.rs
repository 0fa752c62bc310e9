//! Copy a code block to the system clipboard.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use folio_markup::{Clipboard, ClipboardError, CodeFragment, CopyButton, Fragment, COPY_FEEDBACK};

use crate::config::{load_config, load_store};

/// System clipboard backed by arboard.
struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn open() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::debug!("System clipboard unavailable: {}", e);
                None
            }
        };
        Self { inner }
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("no system clipboard".to_string()))?;

        clipboard.set_text(text).map_err(|e| match e {
            arboard::Error::ClipboardOccupied => ClipboardError::Denied(e.to_string()),
            other => ClipboardError::Unavailable(other.to_string()),
        })
    }
}

/// Run the copy command.
pub async fn run(config_path: &Path, slug: &str, block: usize) -> Result<()> {
    let file_config = load_config(config_path)?;
    let store = load_store(&file_config)?;

    let post = store
        .get(slug)
        .with_context(|| format!("No post with slug '{}'", slug))?;
    let fragments = post.render(&file_config.render);
    let code = nth_code_block(&fragments, block)?;

    let mut clipboard = SystemClipboard::open();
    let mut button = CopyButton::new();
    let now = Instant::now();

    // Copy failures are not surfaced; the label just never changes.
    if !button.press(code, &mut clipboard, now) {
        return Ok(());
    }

    tracing::info!(
        "{} {} lines of {}",
        button.label(now).as_str(),
        code.lines.len(),
        code.language
    );

    // X11 and Wayland drop the selection when the owning process exits
    tokio::time::sleep(COPY_FEEDBACK).await;
    tracing::debug!("Label back to {}", button.label(Instant::now()).as_str());

    Ok(())
}

/// Pick the `block`-th code fragment, counting from 1.
fn nth_code_block(fragments: &[Fragment], block: usize) -> Result<&CodeFragment> {
    let blocks: Vec<&CodeFragment> = fragments.iter().filter_map(Fragment::as_code).collect();

    if blocks.is_empty() {
        anyhow::bail!("Post has no code blocks");
    }

    block
        .checked_sub(1)
        .and_then(|i| blocks.get(i).copied())
        .with_context(|| format!("Code block {} out of range (1-{})", block, blocks.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_markup::{render_markup, RenderOptions};

    fn fragments() -> Vec<Fragment> {
        render_markup(
            "a\n```kotlin\nval x = 1\n```\nb\n```\nplain\n```",
            &RenderOptions::default(),
        )
    }

    #[test]
    fn picks_blocks_from_one() {
        let fragments = fragments();

        assert_eq!(nth_code_block(&fragments, 1).unwrap().language, "kotlin");
        assert_eq!(nth_code_block(&fragments, 2).unwrap().language, "text");
        assert_eq!(nth_code_block(&fragments, 2).unwrap().source(), "plain");
    }

    #[test]
    fn rejects_out_of_range_blocks() {
        let fragments = fragments();

        assert!(nth_code_block(&fragments, 0).is_err());
        assert!(nth_code_block(&fragments, 3).is_err());
    }

    #[test]
    fn rejects_posts_without_code() {
        let fragments = render_markup("just prose", &RenderOptions::default());
        let err = nth_code_block(&fragments, 1).unwrap_err();

        assert!(err.to_string().contains("no code blocks"));
    }
}
