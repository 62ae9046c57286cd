//! HTML helper functions

use super::url::url_for;
use crate::config::SiteConfig;

/// Escape text content
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a quoted attribute value
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to(&config, "/view/hooks.md", "Hooks") // -> <a href="/view/hooks.md">Hooks</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_attr(path),
            escape_html(text)
        )
    } else {
        format!(
            r#"<a href="{}">{}</a>"#,
            escape_attr(&url_for(config, path)),
            escape_html(text)
        )
    }
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
