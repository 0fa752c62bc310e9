//! Static page generation for folio blogs.
//!
//! Lays rendered fragments out in minimal page shells and writes the blog,
//! its per-post fragment JSON, and the copy-button assets to disk.

pub mod assets;
pub mod builder;
pub mod pages;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use pages::{PageRenderer, RenderedPost};
pub use templates::SiteContext;
