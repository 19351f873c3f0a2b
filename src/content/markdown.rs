//! Markdown rendering with syntax highlighting

use ammonia::Builder as Sanitizer;
use indexmap::IndexMap;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::config::{ExcerptConfig, HighlightConfig};
use crate::helpers::html_escape;

/// Highlighted tokens get `hl-` prefixed classes so they cannot clash with page styles
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write HTML: {0}")]
    Write(#[from] std::fmt::Error),
    #[error("highlight theme `{0}` is not available")]
    MissingTheme(String),
    #[error("failed to build highlight stylesheet: {0}")]
    Stylesheet(#[from] syntect::Error),
}

/// A fenced or indented code block being collected
struct CodeBlock {
    lang: Option<String>,
    source: String,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    auto_detect: bool,
    aliases: IndexMap<String, String>,
    sanitizer: Sanitizer<'static>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        let aliases = config
            .aliases
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_ascii_lowercase()))
            .collect();

        Self {
            // syntect's bundled set lacks TypeScript, TOML and friends
            syntax_set: two_face::syntax::extra_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            auto_detect: config.auto_detect,
            aliases,
            sanitizer: build_sanitizer(),
        }
    }

    /// Render markdown to sanitized HTML
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        // Front-matter is stripped before we get here, so no metadata blocks
        let parser = Parser::new_ext(markdown, markdown_options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        source: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted = self.highlight_code(&block.source, block.lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some(block) => block.source.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::write_html_fmt(&mut html_output, events.into_iter())?;

        Ok(self.sanitizer.clean(&html_output).to_string())
    }

    /// Highlight a code block, falling back to plain escaped code
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.map(|lang| self.resolve_alias(lang));
        let syntax = match lang {
            Some(lang) => self.find_syntax(lang),
            None if self.auto_detect => self.detect_syntax(code),
            None => None,
        };

        let Some(syntax) = syntax else {
            return plain_code_block(code, lang);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!("Highlighting as {} failed, using plain code: {}", syntax.name, e);
                return plain_code_block(code, lang);
            }
        }

        format!(
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            language_class(&syntax.name),
            generator.finalize()
        )
    }

    /// Look up an already alias-resolved fence tag
    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        if matches!(lang, "text" | "plain" | "plaintext" | "txt") {
            return None;
        }
        self.syntax_set.find_syntax_by_token(lang)
    }

    /// Resolve a short fence tag to the language name it stands for
    pub fn resolve_alias<'a>(&'a self, lang: &'a str) -> &'a str {
        self.aliases.get(lang).map(String::as_str).unwrap_or(lang)
    }

    /// Best-effort guess for untagged fences (shebangs, `<?php`, `<?xml`, ...)
    fn detect_syntax(&self, code: &str) -> Option<&SyntaxReference> {
        let first_line = code.lines().next()?;
        self.syntax_set
            .find_syntax_by_first_line(first_line)
            .filter(|s| s.name != "Plain Text")
    }

    /// Stylesheet for the highlight classes in the configured theme
    pub fn highlight_css(&self) -> Result<String, RenderError> {
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| RenderError::MissingTheme(self.theme_name.clone()))?;
        Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
    }

    /// Plain-text excerpt of a markdown body.
    ///
    /// Text before the configured separator wins; otherwise the leading text
    /// up to the first heading or thematic break, cut to the configured length.
    pub fn excerpt(body: &str, config: &ExcerptConfig) -> String {
        let separator = config.separator.as_str();
        if !separator.is_empty() {
            if let Some(pos) = body.find(separator) {
                return plain_text(&body[..pos], false);
            }
        }

        truncate_chars(&plain_text(body, true), config.length)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Raw HTML inside posts is untrusted; keep only markup markdown itself produces
fn build_sanitizer() -> Sanitizer<'static> {
    let mut builder = Sanitizer::default();
    builder.add_generic_attributes(&["class", "id"]);
    builder.add_tags(&["input"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder
}

/// First word of a fence info string, e.g. `rust,ignore` or `{.python}`
fn fence_language(info: &str) -> Option<String> {
    let token = info
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or("")
        .trim_matches(|c| c == '{' || c == '}' || c == '.');
    if token.is_empty() {
        None
    } else {
        Some(token.to_ascii_lowercase())
    }
}

fn language_class(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}

fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Text content of markdown with whitespace collapsed.
/// With `stop_at_boundary`, headings before any text are skipped and the
/// first heading or rule after text ends the collection.
fn plain_text(markdown: &str, stop_at_boundary: bool) -> String {
    let mut text = String::new();
    let mut in_code_block = false;
    let mut in_heading = false;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                if stop_at_boundary && !text.trim().is_empty() {
                    break;
                }
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                text.push(' ');
            }
            Event::Rule if stop_at_boundary && !text.trim().is_empty() => break,
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) | Event::Code(t) => {
                if in_code_block || (stop_at_boundary && in_heading) {
                    continue;
                }
                text.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::Paragraph) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"<pre class="highlight">"#));
        assert!(html.contains("language-rust"));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_alias_resolution() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.resolve_alias("js"), "javascript");
        assert_eq!(renderer.resolve_alias("rust"), "rust");

        let html = renderer.render("```js\nconst x = 1;\n```").unwrap();
        assert!(html.contains("language-javascript"));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```klingon\nqapla batlh\n```")
            .unwrap();
        assert!(html.contains("qapla batlh"));
        assert!(html.contains("language-klingon"));
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_typescript_alias_is_highlighted() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.resolve_alias("ts"), "typescript");

        let html = renderer.render("```ts\nconst y: number = 2;\n```").unwrap();
        assert!(html.contains(r#"<pre class="highlight"><code class="language-typescript">"#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_plain_fallback_uses_resolved_alias() {
        let mut config = HighlightConfig::default();
        config
            .aliases
            .insert("alien".to_string(), "klingon".to_string());
        let renderer = MarkdownRenderer::with_options(&config);

        let html = renderer.render("```alien\nqapla\n```").unwrap();
        assert!(html.contains(r#"<pre><code class="language-klingon">qapla"#));
        assert!(!html.contains("language-alien"));
    }

    #[test]
    fn test_untagged_fence_detection() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```\n#!/bin/bash\necho hi\n```")
            .unwrap();
        assert!(html.contains("hl-"));

        let html = renderer.render("```\njust words\n```").unwrap();
        assert!(html.contains("<pre><code>just words\n</code></pre>"));
    }

    #[test]
    fn test_detection_can_be_disabled() {
        let config = HighlightConfig {
            auto_detect: false,
            ..HighlightConfig::default()
        };
        let renderer = MarkdownRenderer::with_options(&config);
        let html = renderer
            .render("```\n#!/bin/bash\necho hi\n```")
            .unwrap();
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_code_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```nope\n<script>alert(1)</script>\n```")
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_raw_html_is_sanitized() {
        let renderer = MarkdownRenderer::new();
        let markdown = "Hello <script>alert(1)</script>\n\n<img src=\"x.png\" onerror=\"alert(1)\">\n\n[click](javascript:alert(1))";
        let html = renderer.render(markdown).unwrap();
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_highlight_css() {
        let renderer = MarkdownRenderer::new();
        let css = renderer.highlight_css().unwrap();
        assert!(css.contains(".hl-"));

        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..HighlightConfig::default()
        };
        let renderer = MarkdownRenderer::with_options(&config);
        assert!(matches!(
            renderer.highlight_css(),
            Err(RenderError::MissingTheme(_))
        ));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("Rust"), Some("rust".to_string()));
        assert_eq!(fence_language("rust,ignore"), Some("rust".to_string()));
        assert_eq!(fence_language("{.python}"), Some("python".to_string()));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_excerpt_separator() {
        let config = ExcerptConfig::default();
        let body = "This is **excerpt**.\n<!-- more -->\nThis is more content.";
        assert_eq!(MarkdownRenderer::excerpt(body, &config), "This is excerpt.");
    }

    #[test]
    fn test_excerpt_stops_at_heading() {
        let config = ExcerptConfig::default();
        let body = "# Title\n\nFirst paragraph\nwith `code`.\n\n## Next\n\nNot included.";
        assert_eq!(
            MarkdownRenderer::excerpt(body, &config),
            "First paragraph with code."
        );
    }

    #[test]
    fn test_excerpt_truncates() {
        let config = ExcerptConfig {
            length: 10,
            ..ExcerptConfig::default()
        };
        let body = "一二三四五六七八九十十一十二";
        assert_eq!(MarkdownRenderer::excerpt(body, &config), "一二三四五六七八九十…");
    }

    #[test]
    fn test_excerpt_empty_body() {
        assert_eq!(MarkdownRenderer::excerpt("", &ExcerptConfig::default()), "");
    }
}
