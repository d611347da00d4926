use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The crawl artifact: every successfully fetched URL mapped to its entry.
/// This is the sole interchange format between the crawler and downstream
/// consumers (domain graph, vector-space index).
pub type LinkMap = HashMap<String, CrawlEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlEntry {
    pub url: String,
    /// Normalized page text. Only present for primary URLs (crawl seeds);
    /// pages reached by expansion carry links only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Cross-domain links discovered on this page, in document order.
    /// Same-domain links are never recorded here.
    pub outbound_links: Vec<String>,
}

impl CrawlEntry {
    pub fn new(url: String) -> Self {
        Self {
            url,
            text: None,
            outbound_links: Vec::new(),
        }
    }

    /// Whether this entry was a crawl seed (carries indexable text).
    pub fn is_primary(&self) -> bool {
        self.text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_omitted_when_absent() {
        let entry = CrawlEntry::new("http://example.com/".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"text\""));
    }

    #[test]
    fn test_text_serialized_when_present() {
        let mut entry = CrawlEntry::new("http://example.com/".to_string());
        entry.text = Some("hello world".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"text\":\"hello world\""));
    }

    #[test]
    fn test_link_map_round_trip() {
        let mut map = LinkMap::new();
        let mut primary = CrawlEntry::new("http://example.com/".to_string());
        primary.text = Some("page text".to_string());
        primary
            .outbound_links
            .push("http://other.org/page".to_string());
        map.insert(primary.url.clone(), primary);
        map.insert(
            "http://other.org/page".to_string(),
            CrawlEntry::new("http://other.org/page".to_string()),
        );

        let json = serde_json::to_string(&map).unwrap();
        let restored: LinkMap = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, map);
    }
}
