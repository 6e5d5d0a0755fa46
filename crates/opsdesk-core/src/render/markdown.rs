//! Markdown-ish message renderer.
//!
//! Converts the restricted text markup used in message bodies (bold,
//! italics, inline code, links, bare URLs, hashtags, horizontal rules)
//! into an HTML fragment.
//!
//! Raw text is HTML-escaped before any markup substitution, and bare-URL
//! linkification skips URLs already wrapped by the link rule. The
//! substitution order is fixed; rearranging it corrupts the output.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?P<text>[^\]]+)\]\((?P<url>[^)\s]+)\)").unwrap());

static BOLD_ASTERISKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(?P<t>[^*]+)\*\*").unwrap());

static BOLD_UNDERSCORES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__(?P<t>[^_]+)__").unwrap());

static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(?P<t>[^*]+)\*").unwrap());

static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(?P<t>[^`]+)`").unwrap());

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<pre>^|\s)#(?P<tag>\w+)").unwrap());

// The preceding-character class keeps URLs already sitting inside an
// href="..." or anchor text from being wrapped a second time.
static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?P<pre>^|[^">=])(?P<url>https?://[^\s<"]+)"#).unwrap());

static HORIZONTAL_RULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-{5,}[ \t]*$").unwrap());

/// Renders message markup into an HTML fragment.
///
/// Supported markup: `[text](url)` links, `**bold**` / `__bold__`,
/// `*italics*`, `` `inline code` ``, `#hashtags`, bare `http(s)` URLs,
/// lines of five or more dashes as horizontal rules, and newlines as line
/// breaks.
///
/// The three reserved characters `&`, `<`, `>` are escaped before any
/// substitution, so injected markup in raw user text never survives into
/// the output.
pub fn render_message_html(input: &str) -> String {
    let text = escape_reserved(input);

    let text = LINK_RE.replace_all(&text, r#"<a href="${url}">${text}</a>"#);
    let text = BOLD_ASTERISKS_RE.replace_all(&text, "<strong>${t}</strong>");
    let text = BOLD_UNDERSCORES_RE.replace_all(&text, "<strong>${t}</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>${t}</em>");
    let text = INLINE_CODE_RE.replace_all(&text, "<code>${t}</code>");
    let text = HASHTAG_RE.replace_all(&text, r#"${pre}<span class="hashtag">#${tag}</span>"#);
    let text = BARE_URL_RE.replace_all(&text, r#"${pre}<a href="${url}">${url}</a>"#);
    let text = HORIZONTAL_RULE_RE.replace_all(&text, "<hr>");

    text.replace('\n', "<br>")
}

fn escape_reserved(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_tags_never_survive() {
        let html = render_message_html("<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_bold_italic_code_in_order() {
        let html = render_message_html("**a** *b* `c`");
        assert_eq!(html, "<strong>a</strong> <em>b</em> <code>c</code>");
    }

    #[test]
    fn test_bold_with_underscores() {
        assert_eq!(render_message_html("__a__"), "<strong>a</strong>");
    }

    #[test]
    fn test_link_with_text() {
        let html = render_message_html("see [the docs](https://example.com/docs)");
        assert_eq!(
            html,
            r#"see <a href="https://example.com/docs">the docs</a>"#
        );
    }

    #[test]
    fn test_bare_url_is_linkified_once() {
        let html = render_message_html("visit https://example.com today");
        assert_eq!(
            html,
            r#"visit <a href="https://example.com">https://example.com</a> today"#
        );
    }

    #[test]
    fn test_url_inside_link_is_not_relinkified() {
        let html = render_message_html("[site](https://example.com) and https://other.org");
        assert_eq!(
            html,
            r#"<a href="https://example.com">site</a> and <a href="https://other.org">https://other.org</a>"#
        );
        // Exactly one anchor per URL.
        assert_eq!(html.matches("https://example.com").count(), 1);
        assert_eq!(html.matches("https://other.org").count(), 2);
    }

    #[test]
    fn test_url_as_link_text_is_left_alone() {
        let html = render_message_html("[https://a.com](https://b.com)");
        assert_eq!(html, r#"<a href="https://b.com">https://a.com</a>"#);
    }

    #[test]
    fn test_hashtags() {
        let html = render_message_html("booked #urgent #vip");
        assert_eq!(
            html,
            r#"booked <span class="hashtag">#urgent</span> <span class="hashtag">#vip</span>"#
        );
    }

    #[test]
    fn test_horizontal_rule_and_line_breaks() {
        let html = render_message_html("above\n-----\nbelow");
        assert_eq!(html, "above<br><hr><br>below");
    }

    #[test]
    fn test_four_dashes_is_not_a_rule() {
        let html = render_message_html("----");
        assert_eq!(html, "----");
    }

    #[test]
    fn test_escape_happens_before_substitution() {
        let html = render_message_html("<b>**x**</b>");
        assert_eq!(html, "&lt;b&gt;<strong>x</strong>&lt;/b&gt;");
    }

    #[test]
    fn test_ampersand_is_escaped() {
        assert_eq!(render_message_html("a & b"), "a &amp; b");
    }

    #[test]
    fn test_code_protects_hash_from_hashtag_rule() {
        let html = render_message_html("`#not-a-tag`");
        assert_eq!(html, "<code>#not-a-tag</code>");
    }
}
