//! HTML pages for the listing, post detail and error responses

use crate::content::{CardProps, Listing, Post};
use crate::helpers::{category_url, html_escape, link_to, time_tag};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 64rem; margin: 0 auto; padding: 2rem 1rem; color: #111827; }
a { color: #2563eb; text-decoration: none; }
a:hover { color: #1e40af; }
.tabs { display: flex; gap: .5rem; background: #f3f4f6; padding: .25rem; border-radius: .75rem; margin-bottom: 2rem; }
.tab { flex: 1; text-align: center; padding: .6rem; border-radius: .5rem; color: #4b5563; }
.tab.selected { background: #fff; color: #2563eb; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.cards { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); }
.card { border-radius: .5rem; box-shadow: 0 1px 3px rgba(0,0,0,.12); padding: 1.5rem; }
.badge { display: inline-block; padding: .2rem .75rem; border-radius: 9999px; font-size: .75rem; background: #dbeafe; color: #1e40af; }
time { color: #6b7280; font-size: .875rem; margin-left: .5rem; }
.excerpt { color: #4b5563; }
pre { background: #f9fafb; border: 1px solid #e5e7eb; padding: 1rem; overflow-x: auto; }
"#;

/// Page skeleton shared by every response
pub fn layout(site_title: &str, page_title: &str, body: &str) -> String {
    let title = if page_title.is_empty() || page_title == site_title {
        html_escape(site_title)
    } else {
        format!("{} | {}", html_escape(page_title), html_escape(site_title))
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
<link rel="stylesheet" href="/assets/highlight.css">
</head>
<body>
<header>{home}</header>
<main>
{body}
</main>
</body>
</html>
"#,
        home = link_to("/", site_title, None),
    )
}

/// Category tabs; the selected one is marked
pub fn category_tabs(categories: &[String], selected: &str, all_label: &str) -> String {
    let tabs: Vec<String> = categories
        .iter()
        .map(|category| {
            let class = if category == selected {
                "tab selected"
            } else {
                "tab"
            };
            link_to(&category_url(category, all_label), category, Some(class))
        })
        .collect();
    format!(r#"<nav class="tabs">{}</nav>"#, tabs.join(""))
}

/// One card of the listing grid
pub fn post_card(card: &CardProps<'_>) -> String {
    let href = card.href();
    format!(
        r#"<article class="card">
<span class="badge">{category}</span>{time}
<h3>{title}</h3>
<p class="excerpt">{excerpt}</p>
{more}
</article>"#,
        category = html_escape(card.category),
        time = time_tag(card.date),
        title = link_to(&href, card.title, None),
        excerpt = html_escape(card.excerpt),
        more = link_to(&href, "Read more", Some("more")),
    )
}

/// The listing page
pub fn listing_page(site_title: &str, listing: &Listing, all_label: &str) -> String {
    let cards: Vec<String> = listing
        .posts
        .iter()
        .map(|post| post_card(&post.card()))
        .collect();

    let body = format!(
        r#"<h1>{}</h1>
{}
<div class="cards">
{}
</div>"#,
        html_escape(site_title),
        category_tabs(&listing.categories, &listing.selected, all_label),
        cards.join("\n")
    );

    layout(site_title, site_title, &body)
}

/// The post detail page; `content` is already sanitized by the renderer
pub fn post_page(site_title: &str, post: &Post) -> String {
    let excerpt = if post.excerpt.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="excerpt">{}</p>"#, html_escape(&post.excerpt))
    };

    let body = format!(
        r#"<article>
<header>
<span class="badge">{category}</span>{time}
<h1>{title}</h1>
{excerpt}
</header>
<div class="prose">
{content}
</div>
</article>"#,
        category = html_escape(&post.category),
        time = time_tag(&post.date),
        title = html_escape(&post.title),
        content = post.content.as_deref().unwrap_or_default(),
    );

    layout(site_title, &post.title, &body)
}

pub fn not_found_page(site_title: &str) -> String {
    layout(
        site_title,
        "Not Found",
        r#"<h1>Page not found</h1>
<p>The post you are looking for does not exist. <a href="/">Back to all posts</a></p>"#,
    )
}

pub fn error_page(site_title: &str) -> String {
    layout(
        site_title,
        "Error",
        r#"<h1>Something went wrong</h1>
<p>The page could not be displayed. <a href="/">Back to all posts</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, category: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("<{}>", slug),
            date: "2024-01-01".to_string(),
            category: category.to_string(),
            excerpt: "An & excerpt".to_string(),
            content: Some("<p>Body</p>".to_string()),
        }
    }

    #[test]
    fn test_category_tabs() {
        let categories = vec!["All".to_string(), "Tech".to_string()];
        let html = category_tabs(&categories, "Tech", "All");
        assert!(html.contains(r#"<a href="/" class="tab">All</a>"#));
        assert!(html.contains(r#"<a href="/?category=Tech" class="tab selected">Tech</a>"#));
    }

    #[test]
    fn test_post_card_escapes_fields() {
        let p = post("a", "Tech");
        let html = post_card(&p.card());
        assert!(html.contains(r#"<a href="/posts/a">&lt;a&gt;</a>"#));
        assert!(html.contains("An &amp; excerpt"));
        assert!(html.contains(r#"<time datetime="2024-01-01">"#));
    }

    #[test]
    fn test_post_page_embeds_content() {
        let html = post_page("Blog", &post("a", "Tech"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<title>&lt;a&gt; | Blog</title>"));
    }
}
