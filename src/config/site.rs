//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Content
    /// Directory holding `<slug>.md` files, relative to the site directory
    pub posts_dir: String,
    /// Category given to posts without one
    pub default_category: String,
    /// Label of the universal category that selects every post
    pub all_label: String,
    #[serde(default)]
    pub excerpt: ExcerptConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog Posts".to_string(),
            description: String::new(),

            posts_dir: "content/posts".to_string(),
            default_category: "Uncategorized".to_string(),
            all_label: "All".to_string(),
            excerpt: ExcerptConfig::default(),
            highlight: HighlightConfig::default(),

            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        // An empty file is valid YAML for "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

/// Automatic excerpt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    /// Maximum excerpt length in characters
    pub length: usize,
    /// Marker ending a hand-picked excerpt inside the body
    pub separator: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            length: 200,
            separator: "<!-- more -->".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme used for the generated stylesheet
    pub theme: String,
    /// Guess the language of untagged fences from their first line
    pub auto_detect: bool,
    /// Short fence tags mapped to full language names
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        let aliases = [
            ("js", "javascript"),
            ("ts", "typescript"),
            ("sh", "bash"),
            ("py", "python"),
            ("rs", "rust"),
            ("yml", "yaml"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            theme: "InspiredGitHub".to_string(),
            auto_detect: true,
            aliases,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
