use std::fmt::Write;

use super::escape;
use crate::model::ExtractionResult;
use crate::preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactFlavor {
    Next,
    Remix,
    Vite,
}

impl ReactFlavor {
    fn typed(self) -> bool {
        !matches!(self, ReactFlavor::Vite)
    }

    fn component(self) -> &'static str {
        match self {
            ReactFlavor::Next => "PreviewPage",
            ReactFlavor::Remix => "PreviewRoute",
            ReactFlavor::Vite => "Preview",
        }
    }
}

/// `html`/`css`/`js`/`cdnUrls` declarations shared by every component target.
fn declarations(result: &ExtractionResult, typed: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Captured from {}", result.base_url);
    let _ = writeln!(out, "const html = `{}`;", escape::template_literal(&result.full_html));
    let _ = writeln!(out, "const css = `{}`;", escape::template_literal(&result.full_css));
    let _ = writeln!(out, "const js = `{}`;", escape::template_literal(&result.full_js));
    let annotation = if typed { ": string[]" } else { "" };
    let _ = writeln!(out, "const cdnUrls{} = {};", annotation, cdn_array(result));
    out
}

fn cdn_array(result: &ExtractionResult) -> String {
    let urls = result.required_cdn_urls();
    if urls.is_empty() {
        return "[]".to_string();
    }
    let items: Vec<String> = urls
        .iter()
        .map(|u| format!("  {},", escape::string_literal(u)))
        .collect();
    format!("[\n{}\n]", items.join("\n"))
}

/// Loads one CDN resource; resolves on error too so one dead CDN does not block the page.
fn loader(typed: bool) -> String {
    let (signature, promise) = if typed {
        ("loadResource(url: string): Promise<HTMLElement>", "new Promise<HTMLElement>")
    } else {
        ("loadResource(url)", "new Promise")
    };
    format!(
        r#"function {signature} {{
  return {promise}((resolve) => {{
    const el = url.toLowerCase().endsWith(".css")
      ? Object.assign(document.createElement("link"), {{ rel: "stylesheet", href: url }})
      : Object.assign(document.createElement("script"), {{ src: url, async: false }});
    el.onload = () => resolve(el);
    el.onerror = () => resolve(el);
    document.head.appendChild(el);
  }});
}}
"#
    )
}

/// Injects the captured CSS, then the CDN resources in order, then the captured JS.
/// Returns the teardown that removes everything it added.
fn mount(typed: bool) -> String {
    let (signature, added) = if typed {
        ("mountCapture(): () => void", "const added: HTMLElement[] = [];")
    } else {
        ("mountCapture()", "const added = [];")
    };
    format!(
        r#"function {signature} {{
  {added}
  let cancelled = false;
  const style = document.createElement("style");
  style.textContent = css;
  document.head.appendChild(style);
  added.push(style);
  (async () => {{
    for (const url of cdnUrls) {{
      added.push(await loadResource(url));
      if (cancelled) return;
    }}
    const script = document.createElement("script");
    script.textContent = js;
    document.body.appendChild(script);
    added.push(script);
  }})();
  return () => {{
    cancelled = true;
    added.forEach((el) => el.remove());
  }};
}}
"#
    )
}

pub fn react(result: &ExtractionResult, flavor: ReactFlavor) -> String {
    let typed = flavor.typed();
    let mut out = String::new();
    if flavor == ReactFlavor::Next {
        out.push_str("\"use client\";\n\n");
    }
    out.push_str("import { useEffect } from \"react\";\n\n");
    out.push_str(&declarations(result, typed));
    out.push('\n');
    out.push_str(&loader(typed));
    out.push('\n');
    out.push_str(&mount(typed));
    out.push('\n');
    let _ = write!(
        out,
        r#"export default function {}() {{
  useEffect(() => mountCapture(), []);

  return <div className="captured-page" dangerouslySetInnerHTML={{{{ __html: html }}}} />;
}}
"#,
        flavor.component()
    );
    out
}

pub fn svelte(result: &ExtractionResult) -> String {
    let mut out = String::from("<script>\nimport { onMount } from \"svelte\";\n\n");
    out.push_str(&declarations(result, false));
    out.push('\n');
    out.push_str(&loader(false));
    out.push('\n');
    out.push_str(&mount(false));
    out.push_str("\nonMount(() => mountCapture());\n</script>\n\n");
    out.push_str("<div class=\"captured-page\">{@html html}</div>\n");
    out
}

pub fn vue(result: &ExtractionResult) -> String {
    let mut out =
        String::from("<script setup>\nimport { onMounted, onBeforeUnmount } from \"vue\";\n\n");
    out.push_str(&declarations(result, false));
    out.push('\n');
    out.push_str(&loader(false));
    out.push('\n');
    out.push_str(&mount(false));
    out.push_str(
        r#"
let unmount = () => {};
onMounted(() => {
  unmount = mountCapture();
});
onBeforeUnmount(() => unmount());
</script>

<template>
  <div class="captured-page" v-html="html"></div>
</template>
"#,
    );
    out
}

/// Astro renders statically, so there is no teardown: the inline script runs once per page load.
pub fn astro(result: &ExtractionResult) -> String {
    let mut out = String::from("---\n");
    out.push_str(&escape::frontmatter_fence(&declarations(result, false)));
    out.push_str("---\n\n");
    out.push_str("<div class=\"captured-page\" set:html={html}></div>\n\n");
    out.push_str("<script is:inline define:vars={{ css, js, cdnUrls }}>\n");
    out.push_str(&loader(false));
    out.push('\n');
    out.push_str(&mount(false));
    out.push_str("\nmountCapture();\n</script>\n");
    out
}

/// Static document. CSS and JS sit directly between their tags so they read back unchanged.
pub fn html(result: &ExtractionResult) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{}</title>", preview::text(&result.title));
    let _ = writeln!(out, "<base href=\"{}\">", preview::attr(&result.base_url));
    let _ = writeln!(out, "<!-- Captured from {} -->", result.base_url);
    preview::push_cdn_tags(&mut out, result.required_cdn_urls().iter().map(String::as_str));
    let _ = writeln!(out, "<style>{}</style>", escape::style_body(&result.full_css));
    out.push_str("</head>\n");
    out.push_str(&result.full_html);
    let _ = writeln!(out, "\n<script>{}</script>", escape::script_body(&result.full_js));
    out.push_str("</html>\n");
    out
}
