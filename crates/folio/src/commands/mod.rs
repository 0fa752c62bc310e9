//! CLI commands.

pub mod build;
pub mod copy;
pub mod dev;
pub mod init;
pub mod render;
pub mod serve;
