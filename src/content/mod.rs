//! Content module - reads, parses, renders and filters posts

pub mod catalog;
pub mod filter;
mod frontmatter;
mod markdown;
mod post;
pub mod store;

pub use catalog::{CatalogConfig, Listing, PostCatalog};
pub use filter::{categories, derive_visible, CategoryFilter};
pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use markdown::{MarkdownRenderer, RenderError};
pub use post::{compare_newest_first, sort_newest_first, CardProps, Post};
pub use store::{ContentStore, SourceFile};
