//! Configuration file (folio.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_markup::{ContentStore, RenderOptions};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// TOML file holding the posts
    #[serde(default = "default_content")]
    pub content: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_content() -> PathBuf {
    PathBuf::from("content/posts.toml")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_title() -> String {
    "Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_port() -> u16 {
    7777
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No {} found, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Load the content store named by the config.
pub fn load_store(config: &ConfigFile) -> Result<ContentStore> {
    let store = ContentStore::load(&config.site.content)?;
    tracing::info!(
        "Loaded {} posts from {}",
        store.len(),
        config.site.content.display()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_markup::UnterminatedFence;

    #[test]
    fn defaults_when_missing() {
        let config = load_config(Path::new("/nonexistent/folio.toml")).unwrap();

        assert_eq!(config.site.content, PathBuf::from("content/posts.toml"));
        assert_eq!(config.site.output, PathBuf::from("dist"));
        assert_eq!(config.server.port, 7777);
        assert!(config.build.minify);
        assert!(config.render.escape_html);
    }

    #[test]
    fn parses_partial_config() {
        let config: ConfigFile = toml::from_str(
            r#"
[site]
title = "Notes"

[render]
unterminated_fence = "prose"

[server]
port = 9000
"#,
        )
        .unwrap();

        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.render.unterminated_fence, UnterminatedFence::Prose);
        assert!(config.render.escape_html);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn errors_on_malformed_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, "[site\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
