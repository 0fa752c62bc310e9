//! Lightweight markup renderer for blog content.
//!
//! Splits a content body into prose and fenced code segments, renders prose
//! through a fixed set of line and inline rules, and exposes code segments as
//! line-numbered, syntax-highlighted fragments with a copy affordance. Also
//! provides the slug-keyed content store the renderer is fed from.

pub mod codeblock;
pub mod copy;
pub mod highlight;
pub mod render;
pub mod rules;
pub mod segment;
pub mod store;

pub use codeblock::CodeFragment;
pub use copy::{Clipboard, ClipboardError, CopyButton, CopyLabel, COPY_FEEDBACK};
pub use render::{render_markup, Fragment, HtmlFragment, ProseBlock, RenderOptions, WireFragment};
pub use segment::{segment, Segment, UnterminatedFence};
pub use store::{ContentStore, Post, StoreError};
