//! Blog post records and the slug-keyed content store.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::render::{render_markup, Fragment, RenderOptions};

/// A blog post record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Post {
    /// URL-safe identifier; derived from the title when omitted
    #[serde(default)]
    pub slug: String,

    /// Post title (required)
    pub title: String,

    /// Short summary for the listing page
    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub category: String,

    /// Display string such as "8 min read"
    #[serde(default)]
    pub read_time: String,

    /// Display date, kept as authored
    #[serde(default)]
    pub publish_date: String,

    #[serde(default)]
    pub author: String,

    /// Shown first on the listing page
    #[serde(default)]
    pub featured: bool,

    /// Markup body
    pub content: String,
}

impl Post {
    /// Render this post's body into fragments.
    pub fn render(&self, options: &RenderOptions) -> Vec<Fragment> {
        render_markup(&self.content, options)
    }

    /// Author initials, e.g. "Ada Lovelace" -> "AL".
    pub fn author_initials(&self) -> String {
        self.author
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    posts: Vec<Post>,
}

/// Errors that can occur when loading content.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read content file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid content TOML: {0}")]
    Parse(String),

    #[error("Duplicate post slug: {0}")]
    DuplicateSlug(String),

    #[error("Invalid post slug {0:?} - use lowercase letters, digits and '-'")]
    InvalidSlug(String),

    #[error("Post #{position} has an empty title")]
    EmptyTitle { position: usize },

    #[error("Cannot derive a slug from title {0:?} - set `slug` explicitly")]
    UnsluggableTitle(String),
}

/// Immutable mapping from slug to post, loaded once.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
    index: HashMap<String, usize>,
}

impl ContentStore {
    /// Build a store from posts, validating and filling in slugs.
    pub fn new(posts: Vec<Post>) -> Result<Self, StoreError> {
        let mut index = HashMap::with_capacity(posts.len());
        let mut validated = Vec::with_capacity(posts.len());

        for (i, mut post) in posts.into_iter().enumerate() {
            if post.title.trim().is_empty() {
                return Err(StoreError::EmptyTitle { position: i + 1 });
            }

            if post.slug.is_empty() {
                post.slug = slugify(&post.title);
                if post.slug.is_empty() {
                    return Err(StoreError::UnsluggableTitle(post.title));
                }
            }

            if !is_valid_slug(&post.slug) {
                return Err(StoreError::InvalidSlug(post.slug));
            }

            if index.contains_key(&post.slug) {
                return Err(StoreError::DuplicateSlug(post.slug));
            }

            index.insert(post.slug.clone(), validated.len());
            validated.push(post);
        }

        Ok(Self {
            posts: validated,
            index,
        })
    }

    /// Parse a store from a TOML document of `[[posts]]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self, StoreError> {
        let file: ContentFile =
            toml::from_str(source).map_err(|e| StoreError::Parse(e.to_string()))?;
        Self::new(file.posts)
    }

    /// Load a store from a TOML file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let source = fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let store = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded {} posts from {}", store.len(), path.display());
        Ok(store)
    }

    /// Look up a post by slug.
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.index.get(slug).map(|&i| &self.posts[i])
    }

    /// All posts in file order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The first post marked as featured.
    pub fn featured(&self) -> Option<&Post> {
        self.posts.iter().find(|p| p.featured)
    }

    /// Posts not marked as featured, in file order.
    pub fn regular(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.featured)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(|p| p.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Convert a title to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
