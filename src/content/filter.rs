//! Category filtering of a post listing

use indexmap::IndexSet;

use super::Post;

/// Category tabs for a listing: the universal label first, then every
/// distinct category in the order posts first use it.
pub fn categories(posts: &[Post], all_label: &str) -> Vec<String> {
    let mut set = IndexSet::with_capacity(posts.len() + 1);
    set.insert(all_label);
    for post in posts {
        set.insert(post.category.as_str());
    }
    set.into_iter().map(str::to_string).collect()
}

/// Posts visible under `selection`; everything for the universal label
pub fn derive_visible<'a>(posts: &'a [Post], selection: &str, all_label: &str) -> Vec<&'a Post> {
    if selection == all_label {
        return posts.iter().collect();
    }
    posts.iter().filter(|p| p.category == selection).collect()
}

/// The currently selected category tab.
///
/// Selection is not validated against the current posts: picking a category
/// nobody uses just yields an empty view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    all_label: String,
    selected: String,
}

impl CategoryFilter {
    /// Starts on the universal label
    pub fn new(all_label: impl Into<String>) -> Self {
        let all_label = all_label.into();
        Self {
            selected: all_label.clone(),
            all_label,
        }
    }

    pub fn select(&mut self, category: impl Into<String>) {
        self.selected = category.into();
        tracing::debug!("Selected category {:?}", self.selected);
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn all_label(&self) -> &str {
        &self.all_label
    }

    pub fn is_all(&self) -> bool {
        self.selected == self.all_label
    }

    pub fn visible<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        derive_visible(posts, &self.selected, &self.all_label)
    }
}
