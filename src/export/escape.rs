use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

static SCRIPT_CLOSE: LazyLock<Regex> = LazyLock::new(|| closing("script"));
static STYLE_CLOSE: LazyLock<Regex> = LazyLock::new(|| closing("style"));
static FRONTMATTER_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^---").unwrap());

fn closing(tag: &str) -> Regex {
    RegexBuilder::new(&format!("</({})", tag))
        .case_insensitive(true)
        .build()
        .unwrap()
}

/// `</script` in any case becomes `<\/script`, which no HTML parser treats as an end tag.
///
/// `<!--` becomes `<\!--`: followed by `<script` it would put the parser in the
/// double-escaped state, where the real closing tag no longer ends the element.
pub fn script_body(content: &str) -> String {
    let content = content.replace("<!--", r"<\!--");
    SCRIPT_CLOSE.replace_all(&content, r"<\/$1").into_owned()
}

/// Same as [`script_body`] for `</style`.
pub fn style_body(content: &str) -> String {
    STYLE_CLOSE.replace_all(content, r"<\/$1").into_owned()
}

/// Body of a JS template literal (between backticks).
///
/// Backslashes go first so the escapes added after them survive. The result also
/// carries no `</script` or `</style`, so it can sit inside a component's script block.
pub fn template_literal(content: &str) -> String {
    let escaped = content
        .replace('\\', r"\\")
        .replace('`', r"\`")
        .replace("${", r"\${");
    style_body(&script_body(&escaped))
}

/// A line starting with `---` inside Astro frontmatter would close it. `\-` reads back as `-`
/// in a template literal.
pub fn frontmatter_fence(code: &str) -> String {
    FRONTMATTER_FENCE.replace_all(code, r"\-\-\-").into_owned()
}

/// Double-quoted JS/JSON string literal.
pub fn string_literal(content: &str) -> String {
    // serde_json output is a valid JS string literal; only the script-body sequences need guarding.
    let quoted = serde_json::Value::String(content.to_string()).to_string();
    script_body(&quoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_tags_any_case() {
        assert_eq!(script_body("a</script>b</SCRIPT >"), r"a<\/script>b<\/SCRIPT >");
        assert_eq!(style_body("x</Style>"), r"x<\/Style>");
        assert_eq!(script_body("</style>"), "</style>");
    }

    #[test]
    fn comment_openers_are_defused() {
        assert_eq!(
            script_body("var s = '<!--<script>'; var t = '</script>';"),
            r"var s = '<\!--<script>'; var t = '<\/script>';"
        );
        assert_eq!(style_body("<!-- a -->"), "<!-- a -->");
    }

    #[test]
    fn frontmatter_fences_are_broken_up() {
        assert_eq!(frontmatter_fence("a\n---\nb"), "a\n\\-\\-\\-\nb");
        assert_eq!(frontmatter_fence("a --- b"), "a --- b");
    }

    #[test]
    fn template_literal_escapes() {
        assert_eq!(template_literal(r"a\b"), r"a\\b");
        assert_eq!(template_literal("`${x}`"), r"\`\${x}\`");
        assert_eq!(template_literal("$ {x} and $x"), "$ {x} and $x");
        assert_eq!(template_literal("</script></style>"), r"<\/script><\/style>");
    }

    #[test]
    fn backslash_before_backtick_is_not_swallowed() {
        // \` in the input must not turn into an escaped backtick plus a live one
        assert_eq!(template_literal(r"\`"), r"\\\`");
    }

    #[test]
    fn string_literal_is_quoted_json() {
        assert_eq!(string_literal("https://cdn.test/a.js"), r#""https://cdn.test/a.js""#);
        assert_eq!(string_literal(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(string_literal("</script>"), r#""<\/script>""#);
    }
}
