// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text formatting for content authored in the admin panel.
//!
//! Announcement bodies and calendar descriptions are plain text typed by an
//! editor, sometimes with hand-written anchors pasted in. [`format`] turns
//! that text into markup that is safe to hand to the DOM:
//!
//! - everything is HTML-escaped,
//! - anchors with an `http`, `https`, or `mailto` target survive (their text
//!   is escaped); any other anchor is shown literally,
//! - bare URLs and email addresses become links,
//! - newlines become `<br>`.
//!
//! [`format_description`] is the lighter variant used for resource sections:
//! escaping and line breaks only.

use std::sync::LazyLock;

use regex::{Captures, Regex};

const NEW_TAB: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// A complete `<a ... href=...>text</a>` element; the href is in one of the
/// three value groups depending on quoting.
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))[^>]*>(.*?)</a>"#,
    )
    .expect("anchor pattern compiles")
});

/// A bare URL (group 1) or email address (group 2).
static LINKABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(https?://[^\s<>"]+)|([a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,})"#,
    )
    .expect("linkable pattern compiles")
});

/// Schemes an anchor may point at, with something after them.
static SAFE_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://|mailto:)\S").expect("href pattern compiles")
});

/// Formats raw editor text into safe markup.
#[must_use]
pub fn format(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    let mut at = 0;
    for caps in ANCHOR.captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_plain(&mut out, &raw[at..whole.start()]);
        let href = anchor_href(&caps);
        if is_safe_href(href) {
            push_anchor(&mut out, href, caps.get(4).map_or("", |m| m.as_str()));
        } else {
            push_plain(&mut out, whole.as_str());
        }
        at = whole.end();
    }
    push_plain(&mut out, &raw[at..]);
    out
}

/// Escapes `raw` and converts newlines, without creating links.
#[must_use]
pub fn format_description(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, line) in lines(raw).enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        push_escaped(&mut out, line);
    }
    out
}

/// Appends `s` to `out` with HTML special characters escaped.
pub fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Returns `true` if `href` uses a scheme that may be linked.
#[must_use]
pub fn is_safe_href(href: &str) -> bool {
    SAFE_HREF.is_match(href.trim())
}

fn anchor_href<'h>(caps: &Captures<'h>) -> &'h str {
    (1..=3)
        .find_map(|i| caps.get(i))
        .map_or("", |m| m.as_str())
}

fn push_anchor(out: &mut String, href: &str, text: &str) {
    let href = href.trim();
    out.push_str("<a href=\"");
    push_escaped(out, href);
    out.push('"');
    let mailto = href.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("mailto:"));
    if !mailto {
        out.push_str(NEW_TAB);
    }
    out.push('>');
    push_lines(out, text, push_escaped);
    out.push_str("</a>");
}

fn lines(s: &str) -> impl Iterator<Item = &str> {
    s.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

fn push_lines(out: &mut String, s: &str, mut push: impl FnMut(&mut String, &str)) {
    for (i, line) in lines(s).enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        push(out, line);
    }
}

fn push_plain(out: &mut String, s: &str) {
    push_lines(out, s, push_linkified);
}

/// Escapes one line, turning bare URLs and email addresses into links.
fn push_linkified(out: &mut String, line: &str) {
    let mut at = 0;
    while let Some(caps) = LINKABLE.captures_at(line, at) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        push_escaped(out, &line[at..whole.start()]);
        if caps.get(1).is_some() {
            let url = trim_url(whole.as_str());
            if url.split_once("://").is_some_and(|(_, rest)| !rest.is_empty()) {
                out.push_str("<a href=\"");
                push_escaped(out, url);
                out.push('"');
                out.push_str(NEW_TAB);
                out.push('>');
                push_escaped(out, url);
                out.push_str("</a>");
            } else {
                push_escaped(out, url);
            }
            at = whole.start() + url.len();
        } else {
            let email = whole.as_str();
            out.push_str("<a href=\"mailto:");
            push_escaped(out, email);
            out.push_str("\">");
            push_escaped(out, email);
            out.push_str("</a>");
            at = whole.end();
        }
    }
    push_escaped(out, &line[at..]);
}

/// Drops trailing sentence punctuation and any closing parenthesis that has
/// no opening partner inside the URL.
fn trim_url(mut url: &str) -> &str {
    loop {
        if let Some(s) = url.strip_suffix(['.', ',', ';', ':', '!', '?', '\'']) {
            url = s;
        } else if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        } else {
            return url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = r#" target="_blank" rel="noopener noreferrer">"#;

    #[test]
    fn empty_input() {
        assert_eq!(format(""), "");
        assert_eq!(format_description(""), "");
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(format("Hello\nWorld"), "Hello<br>World");
        assert_eq!(format("a\r\nb"), "a<br>b");
        assert_eq!(format_description("a\n\nb"), "a<br><br>b");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            format("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(format("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(format_description("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn bare_urls_are_linked() {
        let expected = format!(
            "Visit <a href=\"https://sdsu.edu\"{LINK}https://sdsu.edu</a>."
        );
        assert_eq!(format("Visit https://sdsu.edu."), expected);
    }

    #[test]
    fn url_query_is_escaped_inside_link() {
        let out = format("http://a.com/?x=1&y=2");
        assert!(
            out.starts_with("<a href=\"http://a.com/?x=1&amp;y=2\""),
            "got: {out}"
        );
    }

    #[test]
    fn parenthesized_url_keeps_parens_outside() {
        let out = format("(https://x.io)");
        assert!(out.starts_with("(<a href=\"https://x.io\""), "got: {out}");
        assert!(out.ends_with("</a>)"), "got: {out}");
    }

    #[test]
    fn balanced_parens_stay_inside_url() {
        let url = "https://en.wikipedia.org/wiki/Rust_(language)";
        let expected = format!("wiki <a href=\"{url}\"{LINK}{url}</a> ok");
        assert_eq!(format(&format!("wiki {url} ok")), expected);
    }

    #[test]
    fn scheme_alone_is_not_a_link() {
        assert_eq!(format("http://"), "http://");
        assert_eq!(format("see http://."), "see http://.");
    }

    #[test]
    fn emails_become_mailto_links() {
        assert_eq!(
            format("Email club@sdsu.edu now"),
            "Email <a href=\"mailto:club@sdsu.edu\">club@sdsu.edu</a> now"
        );
        assert_eq!(
            format("(club@sdsu.edu)."),
            "(<a href=\"mailto:club@sdsu.edu\">club@sdsu.edu</a>)."
        );
    }

    #[test]
    fn not_quite_emails_stay_text() {
        assert_eq!(format("@handle"), "@handle");
        assert_eq!(format("a@b"), "a@b");
        assert_eq!(format("x@y.1"), "x@y.1");
    }

    #[test]
    fn safe_anchors_survive() {
        let out = format("See <a href=\"https://x.org\">the <site></a>\nbye");
        let expected = format!(
            "See <a href=\"https://x.org\"{LINK}the &lt;site&gt;</a><br>bye"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn mailto_anchor_has_no_target() {
        assert_eq!(
            format("<A HREF='mailto:a@b.co'>mail</A>"),
            "<a href=\"mailto:a@b.co\">mail</a>"
        );
    }

    #[test]
    fn unsafe_anchors_are_shown_literally() {
        assert_eq!(
            format("<a href=\"javascript:alert(1)\">x</a>"),
            "&lt;a href=&quot;javascript:alert(1)&quot;&gt;x&lt;/a&gt;"
        );
    }

    #[test]
    fn unterminated_anchor_is_text() {
        assert_eq!(format("<a href=\"https://x.org\">oops"), {
            let mut s = String::from("&lt;a href=&quot;");
            s.push_str("<a href=\"https://x.org\"");
            s.push_str(LINK);
            s.push_str("https://x.org</a>&quot;&gt;oops");
            s
        });
    }

    #[test]
    fn href_scheme_check() {
        assert!(is_safe_href(" https://x.org "));
        assert!(is_safe_href("MAILTO:a@b.co"));
        assert!(!is_safe_href("javascript:alert(1)"));
        assert!(!is_safe_href("https://"));
        assert!(!is_safe_href("/relative"));
    }
}
