//! List site content

use anyhow::Result;

use crate::content::Listing;
use crate::Blog;

/// Print the post listing, optionally filtered to one category
pub fn run(blog: &Blog, category: Option<&str>, json: bool) -> Result<()> {
    let listing = blog.catalog()?.listing(category)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", format_listing(&listing));
    }
    Ok(())
}

/// Print the category set
pub fn categories(blog: &Blog) -> Result<()> {
    for category in blog.catalog()?.categories()? {
        println!("{}", category);
    }
    Ok(())
}

fn format_listing(listing: &Listing) -> String {
    let mut out = format!("Posts in {} ({}):\n", listing.selected, listing.posts.len());
    for post in &listing.posts {
        let date = if post.date.is_empty() { "----------" } else { &post.date };
        out.push_str(&format!(
            "  {} - {} [{}] ({})\n",
            date, post.title, post.category, post.slug
        ));
    }
    out
}
