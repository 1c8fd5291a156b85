#[cfg(test)]
mod unit_tests {
    use super::super::*;

    #[test]
    fn test_sanitize_html_removes_scripts() {
        let html = r#"<p>Hello</p><script>alert('XSS')</script><p>World</p>"#;
        let sanitized = sanitize::sanitize_html(html);
        assert!(!sanitized.contains("<script"));
        assert!(!sanitized.contains("alert"));
        assert!(sanitized.contains("Hello"));
        assert!(sanitized.contains("World"));
    }

    #[test]
    fn test_sanitize_removes_dangerous_attributes() {
        let html = r#"<a href="javascript:alert('XSS')">Click me</a>"#;
        let sanitized = sanitize::sanitize_html(html);
        assert!(!sanitized.contains("javascript:"));
    }

    #[test]
    fn test_markdown_bold_snapshot() {
        insta::assert_snapshot!(markdown::to_html("**bold**").trim_end(), @"<p><strong>bold</strong></p>");
    }

    #[test]
    fn test_escape_text_snapshot() {
        insta::assert_snapshot!(sanitize::escape_text("a<b"), @"a&lt;b");
    }

    #[test]
    fn test_markdown_preview_document() {
        let doc = render(PreviewKind::from_language_id("markdown"), "# Title");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_markdown_preview_drops_javascript_links() {
        let doc = render(PreviewKind::Markdown, "[x](javascript:alert(1))");
        assert!(!doc.contains("javascript:"));
        assert!(doc.contains(">x</a>"));
    }

    #[test]
    fn test_markdown_table_rendering() {
        let markdown = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = to_html(markdown);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>"));
        assert!(html.contains("<td>"));
    }
}
