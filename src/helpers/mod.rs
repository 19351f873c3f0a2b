//! Helper functions for building pages
//!
//! URL construction and small HTML snippets shared by the views.

mod html;
mod url;

pub use html::*;
pub use url::*;
