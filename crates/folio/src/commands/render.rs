//! Print a post's rendered fragments.

use std::path::Path;

use anyhow::{Context, Result};
use folio_markup::{ContentStore, Fragment, RenderOptions};

use crate::config::{load_config, load_store};
use crate::Format;

/// Run the render command.
pub async fn run(config_path: &Path, slug: &str, format: Format) -> Result<()> {
    let file_config = load_config(config_path)?;
    let store = load_store(&file_config)?;

    println!("{}", render_post(&store, slug, &file_config.render, format)?);

    Ok(())
}

/// Render `slug` as fragment JSON or concatenated HTML.
fn render_post(
    store: &ContentStore,
    slug: &str,
    options: &RenderOptions,
    format: Format,
) -> Result<String> {
    let post = store
        .get(slug)
        .with_context(|| format!("No post with slug '{}'", slug))?;

    let fragments = post.render(options);
    tracing::debug!("Rendered {} into {} fragments", slug, fragments.len());

    match format {
        Format::Json => {
            serde_json::to_string_pretty(&fragments).context("Failed to serialize fragments")
        }
        Format::Html => Ok(fragments
            .iter()
            .map(Fragment::to_html)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContentStore {
        ContentStore::from_toml_str(
            r#"
[[posts]]
slug = "hello"
title = "Hello"
content = """
Intro
```rust
fn main() {}
```
Outro"""
"#,
        )
        .unwrap()
    }

    #[test]
    fn renders_json() {
        let json = render_post(&store(), "hello", &RenderOptions::default(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let fragments = value.as_array().unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[1]["kind"], "code");
        assert_eq!(fragments[1]["language"], "rust");
        assert_eq!(fragments[1]["lines"][0], "fn main() {}");
    }

    #[test]
    fn renders_html() {
        let html = render_post(&store(), "hello", &RenderOptions::default(), Format::Html).unwrap();

        assert!(html.contains("Intro"));
        assert!(html.contains("code-block"));
        assert!(html.contains("Outro"));
    }

    #[test]
    fn unknown_slug_is_an_error() {
        let err = render_post(&store(), "missing", &RenderOptions::default(), Format::Json)
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
