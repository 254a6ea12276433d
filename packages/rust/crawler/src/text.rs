//! Visible-text and link extraction from parsed HTML.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Elements whose text content is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template"];

/// Extract the visible text of a document as one normalized blob.
///
/// Text nodes are trimmed, empty ones dropped, the rest joined with single
/// spaces, and every whitespace run collapsed to one space.
pub fn visible_text(doc: &Html) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let parts: Vec<&str> = doc
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    WS_RE.replace_all(&parts.join(" "), " ").into_owned()
}

/// Resolve every `<a href>` in `doc` against `base`.
///
/// Resolution follows the URL standard, so relative paths, protocol-relative
/// hrefs and fragment-only hrefs all produce absolute URLs. Hrefs that cannot
/// be resolved are dropped. Document order is preserved, duplicates included.
pub fn extract_links(doc: &Html, base: &Url, strip_fragments: bool) -> Vec<Url> {
    static LINK_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

    doc.select(&LINK_SEL)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|mut url| {
            if strip_fragments {
                url.set_fragment(None);
            }
            url
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(html: &str) -> String {
        visible_text(&Html::parse_document(html))
    }

    #[test]
    fn joins_text_nodes_with_single_spaces() {
        let html = "<html><head><title>Docs</title></head>\
                    <body><h1>Intro</h1><p>Segment is a\n\n   customer   data platform.</p></body></html>";
        assert_eq!(text_of(html), "Docs Intro Segment is a customer data platform.");
    }

    #[test]
    fn adjacent_inline_nodes_are_space_separated() {
        assert_eq!(text_of("<p>Sources<b>and</b>Destinations</p>"), "Sources and Destinations");
    }

    #[test]
    fn skips_script_and_style() {
        let html = r#"<html><head><style>body { color: red }</style>
            <script>window.analytics = {};</script></head>
            <body><p>Tracking plan</p><script type="text/javascript">track()</script></body></html>"#;
        assert_eq!(text_of(html), "Tracking plan");
    }

    #[test]
    fn skips_comments() {
        assert_eq!(text_of("<p>Visible<!-- hidden --></p>"), "Visible");
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(text_of("<html><body>   \n\t </body></html>"), "");
    }

    #[test]
    fn collapses_unicode_whitespace() {
        assert_eq!(text_of("<p>audience\u{a0}\u{a0}builder</p>"), "audience builder");
    }

    #[test]
    fn resolves_relative_and_protocol_relative_links() {
        let html = r##"<body>
            <a href="/docs/sources/">Sources</a>
            <a href="destinations">Destinations</a>
            <a href="//segment.com/docs/faq">FAQ</a>
            <a href="https://external.com/">External</a>
            <a name="no-href">Anchor without href</a>
        </body>"##;
        let doc = Html::parse_document(html);
        let base = Url::parse("https://segment.com/docs/guides/").unwrap();
        let links: Vec<String> = extract_links(&doc, &base, false)
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            links,
            vec![
                "https://segment.com/docs/sources/",
                "https://segment.com/docs/guides/destinations",
                "https://segment.com/docs/faq",
                "https://external.com/",
            ]
        );
    }

    #[test]
    fn fragments_are_kept_unless_stripped() {
        let doc = Html::parse_document(r##"<a href="#setup">Setup</a>"##);
        let base = Url::parse("https://docs.lytics.com/guide").unwrap();

        let kept = extract_links(&doc, &base, false);
        assert_eq!(kept[0].as_str(), "https://docs.lytics.com/guide#setup");

        let stripped = extract_links(&doc, &base, true);
        assert_eq!(stripped[0].as_str(), "https://docs.lytics.com/guide");
    }

    #[test]
    fn unresolvable_hrefs_are_dropped() {
        let doc = Html::parse_document(r#"<a href="http://[broken">x</a><a href="ok">y</a>"#);
        let base = Url::parse("https://docs.zeotap.com/home/en-us/").unwrap();
        let links = extract_links(&doc, &base, false);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://docs.zeotap.com/home/en-us/ok");
    }
}
