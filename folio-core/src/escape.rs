/// Escape user supplied text for insertion into markup.
///
/// Replaces `&`, `<`, `>`, `"` and `'` so the result is safe both as element
/// text and inside a quoted attribute value.
pub fn escape_text(s: &str) -> String {
    html_escape::encode_quoted_attribute(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_significant_characters() {
        let out = escape_text(r#"<a href="x">Tom & 'Jerry'</a>"#);
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!out.contains('"'));
        assert!(!out.contains('\''));
        assert_eq!(out.matches('&').count(), out.matches(';').count());
        assert!(out.contains("&amp;"));
        assert!(out.contains("&lt;a href="));
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_text("Hello World"), "Hello World");
        assert_eq!(escape_text(""), "");
    }
}
