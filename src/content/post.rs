//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::frontmatter::parse_date_string;
use crate::helpers::post_url;

/// A blog post as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// File name without extension; lookup key and URL segment
    pub slug: String,

    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    pub category: String,

    pub excerpt: String,

    /// Rendered HTML, only present on detail fetches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Post {
    /// Publication date as a calendar value, when it parses
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.date)
    }

    /// Link to the post detail page
    pub fn href(&self) -> String {
        post_url(&self.slug)
    }

    /// The fields a listing card needs
    pub fn card(&self) -> CardProps<'_> {
        CardProps {
            title: &self.title,
            excerpt: &self.excerpt,
            date: &self.date,
            category: &self.category,
            slug: &self.slug,
        }
    }
}

/// Props of a listing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardProps<'a> {
    pub title: &'a str,
    pub excerpt: &'a str,
    pub date: &'a str,
    pub category: &'a str,
    pub slug: &'a str,
}

impl CardProps<'_> {
    pub fn href(&self) -> String {
        post_url(self.slug)
    }
}

/// Newest first. Calendar dates compare as dates; posts whose date does not
/// parse go after all dated posts, ordered by their raw strings.
pub fn compare_newest_first(a: &Post, b: &Post) -> Ordering {
    let key_a = (a.parsed_date(), a.date.as_str());
    let key_b = (b.parsed_date(), b.date.as_str());
    key_b.cmp(&key_a)
}

/// Stable sort, so equal dates keep discovery order
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(compare_newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: date.to_string(),
            category: "Tech".to_string(),
            excerpt: String::new(),
            content: None,
        }
    }

    #[test]
    fn test_sort_calendar_order() {
        // Lexically "2024-9-1" > "2024-10-01"; as dates it is older
        let mut posts = vec![
            post("sept", "2024-9-1"),
            post("oct", "2024-10-01"),
            post("jan", "2024-01-01 08:00"),
        ];
        sort_newest_first(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["oct", "sept", "jan"]);
    }

    #[test]
    fn test_sort_undated_last_and_stable() {
        let mut posts = vec![
            post("undated", ""),
            post("first", "2024-01-01"),
            post("second", "2024-01-01"),
            post("garbage", "someday"),
        ];
        sort_newest_first(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "garbage", "undated"]);
    }

    #[test]
    fn test_card_props() {
        let p = post("hello world", "2024-01-01");
        let card = p.card();
        assert_eq!(card.title, "hello world");
        assert_eq!(card.href(), "/posts/hello%20world");
        assert_eq!(p.href(), card.href());
    }

    #[test]
    fn test_listing_record_omits_content() {
        let json = serde_json::to_value(post("a", "2024-01-01")).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["slug"], "a");
    }
}
