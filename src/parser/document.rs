use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::body;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMAGES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").unwrap());
static OPEN_GRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="og:"]"#).unwrap());
static STYLESHEETS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel~="stylesheet"]"#).unwrap());
static STYLES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("style").unwrap());
static SCRIPTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

const NO_TITLE: &str = "No title found";
const NO_DESCRIPTION: &str = "Not found";

/// `type` values that mark a script as executable JavaScript.
const JS_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/x-javascript",
    "text/ecmascript",
    "application/ecmascript",
    "module",
];

/// A stylesheet or script reference, resolved against the base URL when possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Resolved(Url),
    Unresolvable(String),
}

/// Everything the analysis needs from the DOM, taken in one pass.
/// Holds no reference to the parsed tree, so it can cross await points.
#[derive(Debug, Clone, Default)]
pub struct PageOutline {
    pub title: String,
    pub description: String,
    pub internal_links: usize,
    pub external_links: usize,
    pub images: Vec<String>,
    pub open_graph_tags: usize,
    pub stylesheet_count: usize,
    pub stylesheets: Vec<AssetRef>,
    pub inline_styles: Vec<String>,
    pub external_scripts: Vec<AssetRef>,
    pub inline_scripts: Vec<String>,
    pub body_html: String,
}

pub fn outline(html: &str, base: &Url, host: &str) -> PageOutline {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = document
        .select(&DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let (internal_links, external_links) = count_links(&document, base, host);

    let images = document
        .select(&IMAGES)
        .filter_map(|el| el.value().attr("src"))
        .filter_map(|src| base.join(src.trim()).ok())
        .map(String::from)
        .collect();

    let stylesheet_links: Vec<ElementRef> = document.select(&STYLESHEETS).collect();
    let stylesheets = stylesheet_links
        .iter()
        .filter_map(|el| el.value().attr("href"))
        .map(|href| resolve(base, href))
        .collect();

    let inline_styles = document
        .select(&STYLES)
        .map(|el| el.text().collect::<String>())
        .collect();

    let mut external_scripts = Vec::new();
    let mut inline_scripts = Vec::new();
    for script in document.select(&SCRIPTS) {
        match script.value().attr("src") {
            Some(src) => external_scripts.push(resolve(base, src)),
            None if is_javascript(script) => {
                let text: String = script.text().collect();
                if !text.trim().is_empty() {
                    inline_scripts.push(text);
                }
            }
            None => {}
        }
    }

    PageOutline {
        title,
        description,
        internal_links,
        external_links,
        images,
        open_graph_tags: document.select(&OPEN_GRAPH).count(),
        stylesheet_count: stylesheet_links.len(),
        stylesheets,
        inline_styles,
        external_scripts,
        inline_scripts,
        body_html: body::reconstruct(&document),
    }
}

/// Internal iff the resolved host equals the site's host. Unresolvable hrefs are external.
fn count_links(document: &Html, base: &Url, host: &str) -> (usize, usize) {
    let mut internal = 0;
    let mut external = 0;
    for href in document.select(&ANCHORS).filter_map(|a| a.value().attr("href")) {
        match base.join(href.trim()) {
            Ok(url) if url.host_str() == Some(host) => internal += 1,
            _ => external += 1,
        }
    }
    (internal, external)
}

fn resolve(base: &Url, raw: &str) -> AssetRef {
    match base.join(raw.trim()) {
        Ok(url) => AssetRef::Resolved(url),
        Err(_) => AssetRef::Unresolvable(raw.to_string()),
    }
}

fn is_javascript(script: ElementRef) -> bool {
    match script.value().attr("type") {
        None => true,
        Some(t) => {
            let t = t.trim().to_ascii_lowercase();
            t.is_empty() || JS_TYPES.contains(&t.as_str())
        }
    }
}
