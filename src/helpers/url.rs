//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Percent-encode a single path segment or query value
pub fn encode_url(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Detail page of a post
///
/// # Examples
/// ```ignore
/// post_url("hello-world") // -> "/posts/hello-world"
/// ```
pub fn post_url(slug: &str) -> String {
    format!("/posts/{}", encode_url(slug))
}

/// Listing page filtered to `category`; the universal label links to the bare listing
pub fn category_url(category: &str, all_label: &str) -> String {
    if category == all_label {
        "/".to_string()
    } else {
        format!("/?category={}", encode_url(category))
    }
}
