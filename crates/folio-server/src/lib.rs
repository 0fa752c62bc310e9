//! Development server for folio blogs.
//!
//! Renders posts on request, serves their fragment JSON, and reloads
//! connected browsers when the content file changes.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
