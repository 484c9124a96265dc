use std::sync::LazyLock;

use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text children are emitted verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Serialize `<body>` with its own attributes kept on a wrapping `<body>` tag.
///
/// Scripts, styles and stylesheet links are left out: they travel in the
/// accumulated JS/CSS instead. The tree is only read, never modified.
pub fn reconstruct(document: &Html) -> String {
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut out = String::new();
    open_tag(&mut out, body.value());
    write_children(&mut out, body);
    out.push_str("</body>");
    out
}

fn write_children(out: &mut String, parent: ElementRef<'_>) {
    let raw = RAW_TEXT_ELEMENTS.contains(&parent.value().name());
    for child in parent.children() {
        match child.value() {
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => escape_text(out, text),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    write_element(out, el);
                }
            }
            _ => {}
        }
    }
}

fn write_element(out: &mut String, el: ElementRef<'_>) {
    let element = el.value();
    if is_carried_elsewhere(element) {
        return;
    }
    let name = element.name();
    open_tag(out, element);
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    write_children(out, el);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn is_carried_elsewhere(element: &Element) -> bool {
    match element.name() {
        "script" | "style" => true,
        "link" => element.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case("stylesheet"))
        }),
        _ => false,
    }
}

/// Attributes are written sorted by name so output does not depend on parser map order.
fn open_tag(out: &mut String, element: &Element) {
    let mut attrs: Vec<(&str, &str)> = element.attrs().collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));

    out.push('<');
    out.push_str(element.name());
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(out, value);
        out.push('"');
    }
    out.push('>');
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(html: &str) -> String {
        reconstruct(&Html::parse_document(html))
    }

    #[test]
    fn keeps_body_attributes() {
        let out = body_of(r#"<body class="home dark" data-theme="night"><p>Hi</p></body>"#);
        assert_eq!(out, r#"<body class="home dark" data-theme="night"><p>Hi</p></body>"#);
    }

    #[test]
    fn bare_body_gets_plain_wrapper() {
        let out = body_of("<p>one</p><p>two</p>");
        assert_eq!(out, "<body><p>one</p><p>two</p></body>");
    }

    #[test]
    fn drops_scripts_styles_and_stylesheet_links() {
        let out = body_of(
            r#"<body><script>alert(1)</script><style>p{}</style>
            <link rel="stylesheet" href="/x.css"><link rel="preload" href="/f.woff2"><p>ok</p></body>"#,
        );
        assert!(!out.contains("<script"));
        assert!(!out.contains("<style"));
        assert!(!out.contains("x.css"));
        assert!(out.contains(r#"<link href="/f.woff2" rel="preload">"#));
        assert!(out.contains("<p>ok</p>"));
    }

    #[test]
    fn void_elements_and_comments() {
        let out = body_of(r#"<body><img src="/a.png" alt="A"><br><!-- note --></body>"#);
        assert_eq!(out, r#"<body><img alt="A" src="/a.png"><br><!-- note --></body>"#);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let out = body_of(r#"<body><p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; 3</p></body>"#);
        assert_eq!(
            out,
            r#"<body><p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; 3</p></body>"#
        );
    }

    #[test]
    fn raw_text_elements_are_verbatim() {
        let out = body_of("<body><noscript><img src=\"/t.gif\"></noscript></body>");
        assert!(out.contains("<noscript><img src=\"/t.gif\"></noscript>"));
    }

    #[test]
    fn nested_markup_round_trips() {
        let html = r#"<body><nav><ul><li><a href="/x">X</a></li></ul></nav><svg viewBox="0 0 10 10"><path d="M0 0"></path></svg></body>"#;
        let out = body_of(html);
        assert_eq!(out, html);
    }
}
