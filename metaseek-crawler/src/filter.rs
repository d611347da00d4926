use url::Url;

/// URLs containing any of these substrings are never fetched.
const DEFAULT_CENSORED_TERMS: &[&str] = &[
    "porn", "xxx", "sex", "casino", "gambling", "escort", "viagra",
];

/// Path suffixes the crawler has no use for (binary and media formats).
const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".xml", ".zip", ".mp4", ".avi",
    ".mov", ".mp3", ".wav", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".tar", ".gz",
    ".7z", ".rar", ".exe", ".dmg", ".iso",
];

/// Static URL policy: censored-substring and skip-extension checks.
/// Pure over its configured lists; no side effects.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    censored_terms: Vec<String>,
    skip_extensions: Vec<String>,
}

impl ContentFilter {
    pub fn new(censored_terms: Vec<String>, skip_extensions: Vec<String>) -> Self {
        Self {
            censored_terms: censored_terms.iter().map(|t| t.to_lowercase()).collect(),
            skip_extensions: skip_extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Extend this filter with additional terms and extensions on top of
    /// whatever it already carries.
    pub fn extended(mut self, censored_terms: Vec<String>, skip_extensions: Vec<String>) -> Self {
        self.censored_terms
            .extend(censored_terms.iter().map(|t| t.to_lowercase()));
        self.skip_extensions
            .extend(skip_extensions.iter().map(|e| e.to_lowercase()));
        self
    }

    /// True iff the URL contains a censored term (case-insensitive) or its
    /// path ends with a skip extension (case-insensitive suffix match).
    pub fn is_blocked(&self, url: &str) -> bool {
        let lowered = url.to_lowercase();
        if self.censored_terms.iter().any(|term| lowered.contains(term)) {
            return true;
        }

        // Suffix match runs against the path component only, so query
        // strings and fragments cannot mask or fake an extension.
        let path = Url::parse(url)
            .map(|u| u.path().to_lowercase())
            .unwrap_or(lowered);

        self.skip_extensions.iter().any(|ext| path.ends_with(ext))
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_CENSORED_TERMS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_censored_term_blocks() {
        let filter = ContentFilter::default();
        assert!(filter.is_blocked("http://example.com/casino-reviews"));
    }

    #[test]
    fn test_censored_term_case_insensitive() {
        let filter = ContentFilter::default();
        assert!(filter.is_blocked("http://example.com/CASINO"));
    }

    #[test]
    fn test_skip_extension_blocks() {
        let filter = ContentFilter::default();
        assert!(filter.is_blocked("http://example.com/report.pdf"));
        assert!(filter.is_blocked("http://example.com/archive.ZIP"));
    }

    #[test]
    fn test_extension_in_query_not_blocked() {
        let filter = ContentFilter::default();
        assert!(!filter.is_blocked("http://example.com/download?file=report.pdf"));
    }

    #[test]
    fn test_clean_url_passes() {
        let filter = ContentFilter::default();
        assert!(!filter.is_blocked("http://example.com/articles/rust"));
    }

    #[test]
    fn test_custom_lists() {
        let filter = ContentFilter::new(vec!["forbidden".to_string()], vec![".dat".to_string()]);
        assert!(filter.is_blocked("http://example.com/Forbidden/page"));
        assert!(filter.is_blocked("http://example.com/blob.dat"));
        assert!(!filter.is_blocked("http://example.com/report.pdf"));
    }
}
