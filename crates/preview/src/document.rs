//! Preview documents for the live preview pane and the HTML/CSS/JS playground.
//!
//! Everything returned from here is a complete HTML document ready to be
//! written into an isolated frame.

use lazy_static::lazy_static;
use regex::Regex;

use crate::markdown;
use crate::sanitize::escape_text;

lazy_static! {
    static ref FULL_DOCUMENT: Regex = Regex::new(r"(?i)<!doctype\s+html|<html[\s>]")
        .expect("Invalid FULL_DOCUMENT regex pattern");
    static ref SCRIPT_CLOSE: Regex =
        Regex::new(r"(?i)</script").expect("Invalid SCRIPT_CLOSE regex pattern");
    static ref STYLE_CLOSE: Regex =
        Regex::new(r"(?i)</style").expect("Invalid STYLE_CLOSE regex pattern");
}

/// How a piece of source is turned into a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Markdown,
    Html,
    JavaScript,
    Css,
    Text,
}

impl PreviewKind {
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id {
            "markdown" | "mdx" => Self::Markdown,
            "html" | "xhtml" => Self::Html,
            "javascript" => Self::JavaScript,
            "css" => Self::Css,
            _ => Self::Text,
        }
    }
}

/// Render `source` as a standalone preview document.
pub fn render(kind: PreviewKind, source: &str) -> String {
    log::debug!("Rendering {:?} preview ({} bytes)", kind, source.len());
    match kind {
        PreviewKind::Markdown => wrap_body("", &markdown::to_html(source), ""),
        PreviewKind::Html => {
            if FULL_DOCUMENT.is_match(source) {
                source.to_string()
            } else {
                wrap_body("", source, "")
            }
        }
        PreviewKind::JavaScript => wrap_body("", "", source),
        PreviewKind::Css => wrap_body(source, "", ""),
        PreviewKind::Text => wrap_body("", &format!("<pre>{}</pre>", escape_text(source)), ""),
    }
}

/// Compose the three playground panes into one document.
pub fn playground(html: &str, css: &str, js: &str) -> String {
    wrap_body(css, html, js)
}

fn wrap_body(css: &str, body: &str, js: &str) -> String {
    let mut doc = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if !css.is_empty() {
        doc.push_str("<style>");
        doc.push_str(&STYLE_CLOSE.replace_all(css, "<\\/style"));
        doc.push_str("</style>\n");
    }
    doc.push_str("</head>\n<body>");
    doc.push_str(body);
    if !js.is_empty() {
        doc.push_str("<script>");
        doc.push_str(&SCRIPT_CLOSE.replace_all(js, "<\\/script"));
        doc.push_str("</script>");
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_language_id() {
        assert_eq!(PreviewKind::from_language_id("markdown"), PreviewKind::Markdown);
        assert_eq!(PreviewKind::from_language_id("html"), PreviewKind::Html);
        assert_eq!(PreviewKind::from_language_id("javascript"), PreviewKind::JavaScript);
        assert_eq!(PreviewKind::from_language_id("css"), PreviewKind::Css);
        assert_eq!(PreviewKind::from_language_id("plaintext"), PreviewKind::Text);
        assert_eq!(PreviewKind::from_language_id("rust"), PreviewKind::Text);
    }

    #[test]
    fn test_full_html_document_passes_through() {
        let src = "<!DOCTYPE html><html><body><p>hi</p></body></html>";
        assert_eq!(render(PreviewKind::Html, src), src);
    }

    #[test]
    fn test_html_fragment_is_wrapped() {
        let doc = render(PreviewKind::Html, "<p>hi</p>");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<body><p>hi</p></body>"));
    }

    #[test]
    fn test_html_fragment_keeps_scripts() {
        // The HTML preview runs what the user wrote
        let doc = render(PreviewKind::Html, "<script>go()</script>");
        assert!(doc.contains("<script>go()</script>"));
    }

    #[test]
    fn test_javascript_runs_in_script_tag() {
        let doc = render(PreviewKind::JavaScript, "console.log(1)");
        assert!(doc.contains("<body><script>console.log(1)</script></body>"));
    }

    #[test]
    fn test_script_close_tag_is_neutralized() {
        let doc = render(PreviewKind::JavaScript, "let s = '</script>';");
        assert!(doc.contains("'<\\/script>'"));
        assert_eq!(doc.matches("</script>").count(), 1);
    }

    #[test]
    fn test_css_goes_to_head() {
        let doc = render(PreviewKind::Css, "body { color: red; }");
        assert!(doc.contains("<style>body { color: red; }</style>\n</head>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = render(PreviewKind::Text, "a<b");
        assert!(doc.contains("<pre>a&lt;b</pre>"));
    }

    #[test]
    fn test_playground_layout() {
        let doc = playground("<h1>x</h1>", "h1{}", "run()");
        let style = doc.find("<style>").unwrap();
        let body = doc.find("<body>").unwrap();
        let script = doc.find("<script>").unwrap();
        assert!(style < body && body < script);
    }
}
