//! Static blog builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use folio_markup::{ContentStore, Post, RenderOptions};

use crate::assets::AssetPipeline;
use crate::pages::PageRenderer;
use crate::templates::SiteContext;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Markup rendering options
    pub render: RenderOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            title: "Blog".to_string(),
            render: RenderOptions::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of post pages generated
    pub posts: usize,

    /// Number of code fragments rendered across all posts
    pub code_blocks: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to serialize fragments for {slug}: {message}")]
    SerializeError { slug: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    store: Arc<ContentStore>,
    pages: PageRenderer,
}

impl StaticBuilder {
    /// Create a new static builder over a loaded content store.
    pub fn new(config: BuildConfig, store: Arc<ContentStore>) -> Self {
        let pages = PageRenderer::new(
            SiteContext {
                site_title: config.title.clone(),
                base_url: config.base_url.clone(),
                scripts: vec![],
            },
            config.render,
        );

        Self {
            config,
            store,
            pages,
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let blogs_dir = self.config.output_dir.join("blogs");
        fs::create_dir_all(&blogs_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Rendering is pure, so posts are built in parallel
        let results: Vec<Result<usize, BuildError>> = self
            .store
            .posts()
            .par_iter()
            .map(|post| self.build_post(post, &blogs_dir))
            .collect();

        let mut total_posts = 0;
        let mut total_code_blocks = 0;

        for result in results {
            total_code_blocks += result?;
            total_posts += 1;
        }

        self.build_index(&blogs_dir)?;
        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            posts: total_posts,
            code_blocks: total_code_blocks,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Write one post page and its fragment JSON. Returns the code block count.
    fn build_post(&self, post: &Post, blogs_dir: &Path) -> Result<usize, BuildError> {
        let rendered = self
            .pages
            .render_post(post)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        let post_dir = blogs_dir.join(&post.slug);
        fs::create_dir_all(&post_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(post_dir.join("index.html"), &rendered.html)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let json = serde_json::to_string_pretty(&rendered.fragments).map_err(|e| {
            BuildError::SerializeError {
                slug: post.slug.clone(),
                message: e.to_string(),
            }
        })?;

        fs::write(post_dir.join("fragments.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Built {} ({} fragments)",
            post.slug,
            rendered.fragments.len()
        );

        Ok(rendered.code_blocks())
    }

    /// Write the listing page.
    fn build_index(&self, blogs_dir: &Path) -> Result<(), BuildError> {
        let html = self
            .pages
            .render_index(&self.store)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        fs::write(blogs_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let js = AssetPipeline::generate_js();
        fs::write(assets_dir.join("main.js"), js)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}
