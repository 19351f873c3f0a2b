//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Create a new post file and return its path
pub fn create_post(
    blog: &Blog,
    title: &str,
    category: Option<&str>,
    path: Option<&str>,
) -> Result<PathBuf> {
    let now = chrono::Local::now();

    fs::create_dir_all(&blog.posts_dir)?;

    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = blog.posts_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = FrontMatter {
        title: Some(title.to_string()),
        date: Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
        category: category.map(str::to_string),
        ..Default::default()
    };

    fs::write(&file_path, format!("{}\n", front_matter.to_yaml()?))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();

        let path = create_post(&blog, "Hello: A New World!", Some("Life"), None).unwrap();
        assert_eq!(path, blog.posts_dir.join("hello-a-new-world.md"));

        let post = blog
            .catalog()
            .unwrap()
            .get_post("hello-a-new-world")
            .unwrap();
        assert_eq!(post.title, "Hello: A New World!");
        assert_eq!(post.category, "Life");
        assert!(post.parsed_date().is_some());

        assert!(create_post(&blog, "Hello: A New World!", None, None).is_err());
    }

    #[test]
    fn test_create_post_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        let path = create_post(&blog, "Anything", None, Some("custom.md")).unwrap();
        assert_eq!(path, blog.posts_dir.join("custom.md"));
    }
}
