use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const ELLIPSIS: char = '…';

/// Link and image schemes allowed through to the rendered HTML. Relative URLs have no scheme.
const SAFE_SCHEMES: [&str; 7] = ["http", "https", "ftp", "ftps", "mailto", "news", ""];

/// Shorten text to at most `max_chars` characters, ending with an ellipsis if anything was cut.
///
/// Counts characters rather than bytes so multibyte text is never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

/// The URL's scheme, lowercased, or an empty string for relative URLs.
///
/// Browsers ignore whitespace and control characters inside a scheme, so those don't count.
fn url_scheme(url: &str) -> String {
    let Some(colon) = url.find(':') else {
        return String::new();
    };
    let prefix = &url[..colon];
    if prefix.contains(['/', '?', '#']) {
        return String::new();
    }
    prefix
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase()
}

/// Blank out link targets with schemes like `javascript:`.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if SAFE_SCHEMES.contains(&url_scheme(&url).as_str()) {
        url
    } else {
        log::debug!("Dropping unsafe link target {url:?}");
        CowStr::Borrowed("")
    }
}

/// Render a post's Markdown as HTML.
///
/// Raw HTML embedded in the source is escaped and shown as text, never passed through. Links and
/// images pointing anywhere but the usual web and mail schemes lose their target.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("hello", 30), "hello");
        assert_eq!(truncate_chars(&"x".repeat(30), 30), "x".repeat(30));
    }

    #[test]
    fn long_text_ends_in_ellipsis() {
        let truncated = truncate_chars(&"y".repeat(31), 30);
        assert_eq!(truncated.chars().count(), 30);
        assert!(truncated.ends_with('…'));
        assert!(truncated.starts_with(&"y".repeat(29)));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "ü".repeat(40);
        let truncated = truncate_chars(&text, 30);
        assert_eq!(truncated.chars().count(), 30);
    }

    #[test]
    fn renders_markdown() {
        assert_eq!(
            render_markdown("Hello **world**"),
            "<p>Hello <strong>world</strong></p>\n"
        );
    }

    #[test]
    fn escapes_inline_html() {
        let rendered = render_markdown("click <a href=\"x\">here</a>");
        assert!(!rendered.contains("<a href"));
        assert!(rendered.contains("&lt;a href="));
    }

    #[test]
    fn blanks_script_links_and_images() {
        assert_eq!(
            render_markdown("[click](javascript:alert(1))"),
            "<p><a href=\"\">click</a></p>\n"
        );
        assert_eq!(
            render_markdown("![i](javascript:alert(2))"),
            "<p><img src=\"\" alt=\"i\" /></p>\n"
        );
        let rendered = render_markdown("[shout](JavaScript:alert(3)) [data](data:text/html,hi)");
        assert!(!rendered.contains("avaScript:"));
        assert!(!rendered.contains("href=\"data:"));
    }

    #[test]
    fn blanks_script_autolinks() {
        let rendered = render_markdown("<javascript:alert(1)>");
        assert!(rendered.contains("href=\"\""));
        assert!(!rendered.contains("href=\"javascript"));
    }

    #[test]
    fn keeps_web_mail_and_relative_links() {
        assert_eq!(
            render_markdown("[site](https://example.com/a?b=c)"),
            "<p><a href=\"https://example.com/a?b=c\">site</a></p>\n"
        );
        assert!(render_markdown("[me](mailto:me@example.com)")
            .contains("href=\"mailto:me@example.com\""));
        assert!(render_markdown("[up](../boards/1)").contains("href=\"../boards/1\""));
        assert!(render_markdown("[odd](/path/with:colon)").contains("href=\"/path/with:colon\""));
        assert!(render_markdown("<https://example.com>").contains("href=\"https://example.com\""));
    }

    #[test]
    fn finds_url_schemes() {
        assert_eq!(url_scheme("HTTP://example.com"), "http");
        assert_eq!(url_scheme("java\tscript:alert(1)"), "javascript");
        assert_eq!(url_scheme("relative/path"), "");
        assert_eq!(url_scheme("?q=a:b"), "");
    }

    #[test]
    fn escapes_block_html() {
        let rendered = render_markdown("<script>alert(1)</script>\n");
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
    }
}
