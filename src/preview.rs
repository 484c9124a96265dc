use std::fmt::Write;

use crate::export::escape;
use crate::model::ExtractionResult;

/// Self-contained document that replays an extraction in a sandboxed frame.
///
/// Relative URLs in the captured markup resolve through `<base href>`. CDN requirements
/// load before the captured CSS and JS so library globals exist when the page script runs.
pub fn build_preview_document(result: &ExtractionResult) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(doc, "<base href=\"{}\">", attr(&result.base_url));
    let _ = writeln!(doc, "<title>{}</title>", text(&result.title));
    push_cdn_tags(&mut doc, result.required_cdn_urls().iter().map(String::as_str));
    let _ = writeln!(doc, "<style>\n{}\n</style>", escape::style_body(&result.full_css));
    doc.push_str("</head>\n");
    doc.push_str(&result.full_html);
    let _ = writeln!(doc, "\n<script>\n{}\n</script>", escape::script_body(&result.full_js));
    doc.push_str("</html>\n");
    doc
}

/// `.css` entries become stylesheet links, everything else a classic script.
pub(crate) fn push_cdn_tags<'a>(doc: &mut String, urls: impl Iterator<Item = &'a str>) {
    for url in urls {
        if is_stylesheet(url) {
            let _ = writeln!(doc, "<link rel=\"stylesheet\" href=\"{}\">", attr(url));
        } else {
            let _ = writeln!(doc, "<script src=\"{}\"></script>", attr(url));
        }
    }
}

pub(crate) fn is_stylesheet(url: &str) -> bool {
    url.to_ascii_lowercase().ends_with(".css")
}

pub(crate) fn attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

pub(crate) fn text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
