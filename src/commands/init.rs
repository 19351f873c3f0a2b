//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# inkpress configuration

# Site
title: Blog Posts
description: ''

# Content
posts_dir: content/posts
default_category: Uncategorized
all_label: All
excerpt:
  length: 200
  separator: <!-- more -->

# Code highlighting
highlight:
  theme: InspiredGitHub
  auto_detect: true
  aliases:
    js: javascript
    ts: typescript
    sh: bash
    py: python
    rs: rust
    yml: yaml

# Server
server:
  ip: localhost
  port: 4000
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir)
        .with_context(|| format!("creating {:?}", target_dir))?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let config = SiteConfig::default();
    let posts_dir = target_dir.join(&config.posts_dir);
    fs::create_dir_all(&posts_dir)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
category: {}
---

Welcome to your new blog! This is your very first post.
<!-- more -->

## Writing posts

Every `.md` file in `{}` is a post. Its file name is the URL slug.

```sh
inkpress new "My New Post" --category Notes
```

## Running the server

```sh
inkpress server
```
"#,
        now.format("%Y-%m-%d"),
        config.default_category,
        config.posts_dir
    );

    fs::write(posts_dir.join("hello-world.md"), sample_post)?;
    tracing::debug!("Wrote sample post to {:?}", posts_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blog;

    #[test]
    fn test_init_site() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("blog");
        init_site(&target).unwrap();

        let blog = Blog::new(&target).unwrap();
        assert_eq!(blog.config.title, "Blog Posts");
        assert_eq!(blog.config.highlight.aliases.len(), 6);

        let posts = blog.catalog().unwrap().list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(
            posts[0].excerpt,
            "Welcome to your new blog! This is your very first post."
        );

        assert!(init_site(&target).is_err());
    }
}
