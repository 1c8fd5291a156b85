use comrak::{markdown_to_html, ComrakOptions};

use crate::sanitize::sanitize_html;

/// Render Markdown to HTML that is safe to drop into a preview pane.
pub fn to_html(src: &str) -> String {
    let opt = create_comrak_options();
    sanitize_html(&markdown_to_html(src, &opt))
}

fn create_comrak_options() -> ComrakOptions<'static> {
    let mut opt = ComrakOptions::default();

    // GFM
    opt.extension.strikethrough = true;
    opt.extension.table = true;
    opt.extension.autolink = true;
    opt.extension.tasklist = true;
    opt.extension.footnotes = true;

    opt.parse.smart = true;

    // Raw HTML in the source is escaped, not passed through
    opt.render.unsafe_ = false;
    opt.render.escape = true;

    opt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let md = "# Hello\n\nThis is **bold** and *italic*.";
        let html = to_html(md);
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>"));
        assert!(html.contains("<em>"));
    }

    #[test]
    fn test_gfm_table() {
        let md = "| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |";
        let html = to_html(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<thead>"));
        assert!(html.contains("<tbody>"));
    }

    #[test]
    fn test_strikethrough() {
        let html = to_html("~~gone~~");
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_raw_script_is_not_rendered() {
        let html = to_html("<script>alert('XSS')</script>");
        assert!(!html.contains("<script>"));
    }
}
