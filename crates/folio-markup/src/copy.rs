//! Copy-to-clipboard affordance for code fragments.

use std::time::{Duration, Instant};

use crate::codeblock::CodeFragment;

/// How long the "copied" confirmation stays visible.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Errors from writing to a clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write denied: {0}")]
    Denied(String),
}

/// A destination for copied text.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Button label state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLabel {
    Copy,
    Copied,
}

impl CopyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Copied => "Copied!",
        }
    }
}

/// State of a copy button attached to one code fragment.
#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    copied_at: Option<Instant>,
}

impl CopyButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the fragment's literal body to `clipboard`.
    ///
    /// On success the label shows "Copied!" for [`COPY_FEEDBACK`] from `now`;
    /// pressing again restarts the window. A clipboard failure leaves the
    /// state untouched and is not reported to the caller beyond the return value.
    pub fn press(
        &mut self,
        code: &CodeFragment,
        clipboard: &mut impl Clipboard,
        now: Instant,
    ) -> bool {
        match clipboard.write_text(&code.source()) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(e) => {
                tracing::debug!("Failed to copy code: {}", e);
                false
            }
        }
    }

    /// Label to show at `now`.
    pub fn label(&self, now: Instant) -> CopyLabel {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPY_FEEDBACK => CopyLabel::Copied,
            _ => CopyLabel::Copy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied("not focused".to_string()))
        }
    }

    #[test]
    fn copies_literal_body() {
        let code = CodeFragment::new("kotlin", "val x = 1\nval y = 2");
        let mut clipboard = MemoryClipboard::default();
        let mut button = CopyButton::new();

        assert!(button.press(&code, &mut clipboard, Instant::now()));
        assert_eq!(clipboard.contents.as_deref(), Some("val x = 1\nval y = 2"));
    }

    #[test]
    fn label_reverts_after_feedback_window() {
        let code = CodeFragment::new("text", "x");
        let mut clipboard = MemoryClipboard::default();
        let mut button = CopyButton::new();
        let start = Instant::now();

        assert_eq!(button.label(start), CopyLabel::Copy);

        button.press(&code, &mut clipboard, start);

        assert_eq!(button.label(start), CopyLabel::Copied);
        assert_eq!(
            button.label(start + Duration::from_millis(1999)),
            CopyLabel::Copied
        );
        assert_eq!(button.label(start + COPY_FEEDBACK), CopyLabel::Copy);
    }

    #[test]
    fn pressing_again_restarts_window() {
        let code = CodeFragment::new("text", "x");
        let mut clipboard = MemoryClipboard::default();
        let mut button = CopyButton::new();
        let start = Instant::now();

        button.press(&code, &mut clipboard, start);
        button.press(&code, &mut clipboard, start + Duration::from_millis(1500));

        assert_eq!(
            button.label(start + Duration::from_millis(2500)),
            CopyLabel::Copied
        );
        assert_eq!(
            button.label(start + Duration::from_millis(3500)),
            CopyLabel::Copy
        );
    }

    #[test]
    fn failed_copy_shows_no_confirmation() {
        let code = CodeFragment::new("text", "x");
        let mut button = CopyButton::new();
        let now = Instant::now();

        assert!(!button.press(&code, &mut DeniedClipboard, now));
        assert_eq!(button.label(now), CopyLabel::Copy);
    }

    #[test]
    fn label_text() {
        assert_eq!(CopyLabel::Copy.as_str(), "Copy");
        assert_eq!(CopyLabel::Copied.as_str(), "Copied!");
    }
}
