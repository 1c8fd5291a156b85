use ammonia::Builder;

/// Strip scripts, event handlers and `javascript:` links from rendered HTML.
pub fn sanitize_html(html: &str) -> String {
    Builder::new().clean(html).to_string()
}

/// Escape arbitrary text so it renders literally inside HTML.
pub fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}
