/// Input normalization utility functions / 输入规范化工具函数

/// Characters removed from stored free text / 从自由文本中移除的字符
///
/// This is a minimal denylist, not HTML or SQL escaping. Output escaping
/// belongs to whoever renders the data. / 仅为最小黑名单，非完整转义
pub const DENIED_CHARS: [char; 4] = ['<', '>', '"', '\\'];

/// Strip denied characters from free text / 移除自由文本中的危险字符
pub fn sanitize_text(input: &str) -> String {
    input.chars().filter(|c| !DENIED_CHARS.contains(c)).collect()
}

/// Sanitize an optional free-text field / 处理可选文本字段
pub fn sanitize_opt(input: Option<String>) -> Option<String> {
    input.map(|s| sanitize_text(&s))
}

/// Keep a logo URL only if it is http(s) / 仅保留 http(s) 开头的 logo 地址
///
/// Anything else (javascript:, data:, relative paths) becomes None.
pub fn normalize_logo_url(url: Option<String>) -> Option<String> {
    url.filter(|u| u.starts_with("http://") || u.starts_with("https://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("Alpha"), "Alpha");
        assert_eq!(sanitize_text("<script>alert(\"x\")</script>"), "scriptalert(x)/script");
        assert_eq!(sanitize_text("a\\b"), "ab");
        assert_eq!(sanitize_text("l'union & co"), "l'union & co");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn test_sanitize_opt() {
        assert_eq!(sanitize_opt(None), None);
        assert_eq!(sanitize_opt(Some("<b>".to_string())), Some("b".to_string()));
    }

    #[test]
    fn test_normalize_logo_url() {
        assert_eq!(
            normalize_logo_url(Some("https://example.org/logo.png".to_string())),
            Some("https://example.org/logo.png".to_string())
        );
        assert_eq!(
            normalize_logo_url(Some("http://example.org/logo.png".to_string())),
            Some("http://example.org/logo.png".to_string())
        );
        assert_eq!(normalize_logo_url(Some("javascript:alert(1)".to_string())), None);
        assert_eq!(normalize_logo_url(Some("ftp://example.org".to_string())), None);
        assert_eq!(normalize_logo_url(Some("".to_string())), None);
        assert_eq!(normalize_logo_url(None), None);
    }
}
