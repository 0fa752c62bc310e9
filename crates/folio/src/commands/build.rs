//! Static site build command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use folio_static::{BuildConfig, StaticBuilder};

use crate::config::{load_config, load_store};

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let store = load_store(&file_config)?;

    let config = BuildConfig {
        output_dir: output.unwrap_or_else(|| file_config.site.output.clone()),
        minify: minify.unwrap_or(file_config.build.minify),
        base_url: file_config.site.base_url,
        title: file_config.site.title,
        render: file_config.render,
    };

    let result = StaticBuilder::new(config, Arc::new(store)).build().await?;

    tracing::info!(
        "Built {} posts with {} code blocks in {}ms",
        result.posts,
        result.code_blocks,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
