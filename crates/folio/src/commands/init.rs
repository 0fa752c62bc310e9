//! Scaffold a folio project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");
    scaffold(config_path, Path::new("content"), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the config file and sample content, keeping existing files unless `yes`.
fn scaffold(config_path: &Path, content_dir: &Path, yes: bool) -> Result<()> {
    if content_dir.exists() && !yes {
        tracing::warn!(
            "{}/ directory already exists. Use --yes to overwrite.",
            content_dir.display()
        );
        return Ok(());
    }
    fs::create_dir_all(content_dir).context("Failed to create content directory")?;

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    let posts_path = content_dir.join("posts.toml");
    if !posts_path.exists() || yes {
        fs::write(&posts_path, DEFAULT_POSTS)
            .with_context(|| format!("Failed to write {}", posts_path.display()))?;
        tracing::info!("Created {}", posts_path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[site]
# TOML file holding the posts
content = "content/posts.toml"

# Output directory for built site
output = "dist"

# Site title
title = "My Blog"

# Base URL (for deployment)
base_url = "/"

[render]
# Escape <, >, & and quotes in prose before applying markup
escape_html = true

# What to do with a fence that never closes: "code" or "prose"
unterminated_fence = "code"

[build]
# Enable CSS minification
minify = true

[server]
port = 7777
host = "127.0.0.1"
"#;

const DEFAULT_POSTS: &str = r#"[[posts]]
slug = "open-closed-in-kotlin"
title = "The Open/Closed Principle in Kotlin"
excerpt = "Extend behavior without editing the code that already works."
category = "Design"
read_time = "4 min read"
publish_date = "2024-03-12"
author = "Jane Doe"
featured = true
content = """
# Open for extension
Classes should be *open* for extension but **closed** for modification.
## A shape hierarchy
Each shape knows its own area:
```kotlin
interface Shape {
    fun area(): Double
}

class Circle(val r: Double) : Shape {
    override fun area() = Math.PI * r * r
}
```
> Adding a new shape never touches `Shape`.
- New behavior goes in new classes
- Existing callers keep compiling
"""

[[posts]]
title = "Writing Posts"
excerpt = "The markup folio understands."
category = "Guide"
read_time = "2 min read"
publish_date = "2024-03-20"
author = "Jane Doe"
content = """
# Markup
Use **bold**, *italic* and `inline code` inside a line.
### Code
Fence code with three backticks and an optional language:
```bash
folio build
```
Everything between the fences is shown exactly as written.
"""
"#;
