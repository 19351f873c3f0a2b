//! inkpress: a small markdown blog front-end
//!
//! Posts are `<slug>.md` files with front-matter. The [`content`] module
//! turns them into date-sorted listings and rendered, sanitized detail pages;
//! [`server`] serves both over HTTP with category filtering.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use error::ContentError;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Open a site directory, using defaults when it has no `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        Self {
            config,
            base_dir,
            posts_dir,
        }
    }

    /// Open the post catalog for this site
    pub fn catalog(&self) -> Result<content::PostCatalog> {
        let config = content::CatalogConfig::from_site(&self.config, &self.base_dir);
        content::PostCatalog::new(config)
            .with_context(|| format!("opening posts directory {:?}", self.posts_dir))
    }
}
