//! Lays rendered fragments out inside page templates.

use folio_markup::{ContentStore, Fragment, Post, RenderOptions};

use crate::templates::{IndexContext, PostContext, PostSummary, SiteContext, TemplateEngine};

/// A post rendered to a full page plus the fragments it was built from.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    /// Complete HTML page
    pub html: String,
    /// Fragments in source order
    pub fragments: Vec<Fragment>,
}

impl RenderedPost {
    /// Number of code fragments on the page.
    pub fn code_blocks(&self) -> usize {
        self.fragments.iter().filter(|f| f.as_code().is_some()).count()
    }
}

/// Renders posts and the listing page for one site.
pub struct PageRenderer {
    templates: TemplateEngine,
    site: SiteContext,
    options: RenderOptions,
}

impl PageRenderer {
    pub fn new(site: SiteContext, options: RenderOptions) -> Self {
        Self {
            templates: TemplateEngine::new(),
            site,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a single post page.
    pub fn render_post(&self, post: &Post) -> Result<RenderedPost, minijinja::Error> {
        let fragments = post.render(&self.options);

        let content = fragments
            .iter()
            .map(Fragment::to_html)
            .collect::<Vec<_>>()
            .join("\n");

        let context = PostContext {
            title: post.title.clone(),
            category: post.category.clone(),
            read_time: post.read_time.clone(),
            publish_date: post.publish_date.clone(),
            author: post.author.clone(),
            author_initials: post.author_initials(),
            content,
        };

        let html = self.templates.render_post(&self.site, &context)?;

        Ok(RenderedPost { html, fragments })
    }

    /// Render the listing page: featured post first, then the rest.
    pub fn render_index(&self, store: &ContentStore) -> Result<String, minijinja::Error> {
        let base_url = &self.site.base_url;

        let context = IndexContext {
            featured: store
                .featured()
                .map(|post| PostSummary::from_post(post, base_url)),
            posts: store
                .regular()
                .map(|post| PostSummary::from_post(post, base_url))
                .collect(),
        };

        self.templates.render_index(&self.site, &context)
    }
}
