//! Development server command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use folio_server::{DevServer, DevServerConfig};

use crate::config::{load_config, load_store};

/// Run the dev server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let file_config = load_config(config_path)?;
    let store = load_store(&file_config)?;

    let port = port.unwrap_or(file_config.server.port);
    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        content_path: file_config.site.content,
        port,
        host: file_config.server.host,
        open,
        title: file_config.site.title,
        render: file_config.render,
    };

    DevServer::new(config, Arc::new(store)).start().await?;

    Ok(())
}
