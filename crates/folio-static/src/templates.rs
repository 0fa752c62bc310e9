//! Template engine for rendering blog pages.

use minijinja::{context, Environment};

use folio_markup::Post;

/// Shared fields for every page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub site_title: String,
    /// Base URL
    pub base_url: String,
    /// Extra scripts to load after the page assets
    pub scripts: Vec<String>,
}

/// A post as shown on the listing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostSummary {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub read_time: String,
    pub publish_date: String,
    /// Link to the post page
    pub url: String,
}

impl PostSummary {
    pub fn from_post(post: &Post, base_url: &str) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            read_time: post.read_time.clone(),
            publish_date: post.publish_date.clone(),
            url: post_url(base_url, &post.slug),
        }
    }
}

/// Context for rendering a single post.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostContext {
    pub title: String,
    pub category: String,
    pub read_time: String,
    pub publish_date: String,
    pub author: String,
    pub author_initials: String,
    /// Rendered fragment HTML, in order
    pub content: String,
}

/// Context for rendering the listing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexContext {
    pub featured: Option<PostSummary>,
    pub posts: Vec<PostSummary>,
}

/// URL of a post page under `base_url`.
pub fn post_url(base_url: &str, slug: &str) -> String {
    format!("{}blogs/{}/", base_url, slug)
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())
            .expect("Failed to add post template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    /// Render a post page.
    pub fn render_post(
        &self,
        site: &SiteContext,
        post: &PostContext,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("post.html")?;

        tmpl.render(context! {
            title => &post.title,
            site_title => &site.site_title,
            base_url => &site.base_url,
            scripts => &site.scripts,
            post => post,
        })
    }

    /// Render the post listing page.
    pub fn render_index(
        &self,
        site: &SiteContext,
        index: &IndexContext,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            title => "Blog",
            site_title => &site.site_title,
            base_url => &site.base_url,
            scripts => &site.scripts,
            featured => &index.featured,
            posts => &index.posts,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <script src="{{ base_url }}assets/main.js"></script>
  {% for src in scripts %}<script src="{{ src }}"></script>
  {% endfor %}
</body>
</html>"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <p class="post-meta">
    {% if post.category %}<span class="post-category">{{ post.category }}</span>{% endif %}
    {% if post.read_time %}<span>{{ post.read_time }}</span>{% endif %}
    {% if post.publish_date %}<span>{{ post.publish_date }}</span>{% endif %}
  </p>
  <h1 class="post-title">{{ post.title }}</h1>
  {% if post.author %}
  <p class="post-author"><span class="author-initials">{{ post.author_initials }}</span> {{ post.author }}</p>
  {% endif %}
  <div class="content">
    {{ post.content | safe }}
  </div>
</article>
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="posts">
{% if featured %}
  <article class="post-card featured">
    <span class="post-category">{{ featured.category }}</span>
    <h2><a href="{{ featured.url }}">{{ featured.title }}</a></h2>
    <p>{{ featured.excerpt }}</p>
    <p class="post-meta">{{ featured.read_time }} {{ featured.publish_date }}</p>
  </article>
{% endif %}
{% for post in posts %}
  <article class="post-card">
    <span class="post-category">{{ post.category }}</span>
    <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
    <p>{{ post.excerpt }}</p>
    <p class="post-meta">{{ post.read_time }} {{ post.publish_date }}</p>
  </article>
{% endfor %}
</section>
{% endblock %}"##;
