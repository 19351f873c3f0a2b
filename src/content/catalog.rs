//! Post catalog - listing and detail queries over the content store
//!
//! Every call reads the store again; nothing is cached between queries.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::filter::{categories, derive_visible};
use super::post::sort_newest_first;
use super::store::{ContentStore, SourceFile};
use super::{FrontMatter, MarkdownRenderer, Post};
use crate::config::{ExcerptConfig, HighlightConfig, SiteConfig};
use crate::error::{ContentError, Result};

/// Everything the catalog needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub posts_dir: PathBuf,
    pub default_category: String,
    pub all_label: String,
    pub excerpt: ExcerptConfig,
    pub highlight: HighlightConfig,
}

impl CatalogConfig {
    /// Catalog settings for a site rooted at `base_dir`
    pub fn from_site(config: &SiteConfig, base_dir: &Path) -> Self {
        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            default_category: config.default_category.clone(),
            all_label: config.all_label.clone(),
            excerpt: config.excerpt.clone(),
            highlight: config.highlight.clone(),
        }
    }

    /// Default settings reading from `posts_dir`
    pub fn with_posts_dir<P: Into<PathBuf>>(posts_dir: P) -> Self {
        let site = SiteConfig::default();
        Self {
            posts_dir: posts_dir.into(),
            default_category: site.default_category,
            all_label: site.all_label,
            excerpt: site.excerpt,
            highlight: site.highlight,
        }
    }
}

/// Listing data for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// Posts visible under `selected`, newest first
    pub posts: Vec<Post>,
    /// Category tabs, universal label first
    pub categories: Vec<String>,
    pub selected: String,
}

/// Reads posts from the content store
pub struct PostCatalog {
    store: ContentStore,
    renderer: MarkdownRenderer,
    config: CatalogConfig,
}

impl PostCatalog {
    /// Open the catalog, creating the posts directory on first run
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let store = ContentStore::open(&config.posts_dir)?;
        let renderer = MarkdownRenderer::with_options(&config.highlight);
        Ok(Self {
            store,
            renderer,
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// All posts without rendered content, newest first.
    ///
    /// A file that fails to parse is logged and left out; the rest of the
    /// listing is still returned.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for file in self.store.entries()? {
            match self.load_post(&file, false) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", file.path, e);
                }
            }
        }

        sort_newest_first(&mut posts);
        tracing::debug!("Listed {} posts", posts.len());
        Ok(posts)
    }

    /// One post with its body rendered to HTML
    pub fn get_post(&self, slug: &str) -> Result<Post> {
        let file = self.store.find(slug)?;
        let post = self.load_post(&file, true).inspect_err(|e| {
            if !e.is_not_found() {
                tracing::error!("Failed to load post {:?}: {}", file.path, e);
            }
        })?;
        Ok(post)
    }

    /// Category tabs derived from the current listing
    pub fn categories(&self) -> Result<Vec<String>> {
        Ok(categories(&self.list_posts()?, &self.config.all_label))
    }

    /// Listing filtered by `selection`; `None` selects every post
    pub fn listing(&self, selection: Option<&str>) -> Result<Listing> {
        let all = self.list_posts()?;
        let selected = selection.unwrap_or(self.config.all_label.as_str()).to_string();
        let categories = categories(&all, &self.config.all_label);
        let posts = derive_visible(&all, &selected, &self.config.all_label)
            .into_iter()
            .cloned()
            .collect();

        Ok(Listing {
            posts,
            categories,
            selected,
        })
    }

    fn load_post(&self, file: &SourceFile, render: bool) -> Result<Post> {
        let raw = fs::read_to_string(&file.path).map_err(|source| {
            // Deleted between lookup and read
            if source.kind() == io::ErrorKind::NotFound {
                ContentError::not_found(&file.slug)
            } else {
                ContentError::Io {
                    path: file.path.clone(),
                    source,
                }
            }
        })?;

        let (fm, body) = FrontMatter::parse(&raw).map_err(|e| ContentError::Parse {
            path: file.path.clone(),
            message: e.to_string(),
        })?;

        let content = if render {
            let html = self
                .renderer
                .render(body)
                .map_err(|e| ContentError::Render {
                    path: file.path.clone(),
                    message: e.to_string(),
                })?;
            Some(html)
        } else {
            None
        };

        // The author's excerpt wins on both paths, so listing and detail agree
        let excerpt = fm
            .excerpt
            .unwrap_or_else(|| MarkdownRenderer::excerpt(body, &self.config.excerpt));

        Ok(Post {
            slug: file.slug.clone(),
            title: fm.title.unwrap_or_else(|| file.slug.clone()),
            date: fm.date.unwrap_or_default(),
            category: fm
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| self.config.default_category.clone()),
            excerpt,
            content,
        })
    }
}
