//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate an anchor tag; `text` is escaped, `href` must already be encoded
///
/// # Examples
/// ```ignore
/// link_to("/posts/a", "Read more", None) // -> <a href="/posts/a">Read more</a>
/// ```
pub fn link_to(href: &str, text: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        html_escape(href),
        class_attr,
        html_escape(text)
    )
}

/// Generate a `<time>` tag, omitted for an empty date
pub fn time_tag(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    format!(
        r#"<time datetime="{0}">{0}</time>"#,
        html_escape(date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_link_to() {
        assert_eq!(
            link_to("/posts/a", "<b>A</b>", None),
            r#"<a href="/posts/a">&lt;b&gt;A&lt;/b&gt;</a>"#
        );
        assert_eq!(
            link_to("/?category=x&y", "x", Some("tab")),
            r#"<a href="/?category=x&amp;y" class="tab">x</a>"#
        );
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(time_tag(""), "");
        assert_eq!(
            time_tag("2024-01-01"),
            r#"<time datetime="2024-01-01">2024-01-01</time>"#
        );
    }
}
