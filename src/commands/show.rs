//! Render a single post

use anyhow::Result;

use crate::Blog;

/// Print the rendered HTML of a post
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.catalog()?.get_post(slug)?;
    println!("{}", post.content.unwrap_or_default());
    Ok(())
}
