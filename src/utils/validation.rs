//! URL and input validation utilities

use url::Url;

use crate::core::models::{AppError, AppResult};

/// Clean up pasted input before it is handed to the engine.
///
/// Only obviously empty input is rejected here; whether the engine can
/// resolve the link is decided by the probe.
pub fn normalize_url(raw: &str) -> AppResult<String> {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '<' || c == '>')
        .trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("No URL provided".to_string()));
    }

    if !is_http_url(trimmed) {
        tracing::debug!("Input is not an http(s) URL, passing through: {}", trimmed);
    }

    Ok(trimmed.to_string())
}

/// Check if input parses as an http(s) URL
pub fn is_http_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_pasted_input() {
        assert_eq!(
            normalize_url("  \"https://youtu.be/dQw4w9WgXcQ\"\n").unwrap(),
            "https://youtu.be/dQw4w9WgXcQ"
        );
        assert_eq!(
            normalize_url("<https://www.youtube.com/watch?v=abc>").unwrap(),
            "https://www.youtube.com/watch?v=abc"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize_url("").is_err());
        assert!(normalize_url("   \t").is_err());
        assert!(normalize_url("\"\"").is_err());
    }

    #[test]
    fn test_normalize_passes_non_urls_through() {
        assert_eq!(normalize_url("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_http_url("http://example.com/video"));
        assert!(!is_http_url("ftp://example.com/file"));
        assert!(!is_http_url("not a url"));
    }
}
