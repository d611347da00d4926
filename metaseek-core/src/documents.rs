use metaseek_crawler::result::LinkMap;

/// The (url, text) pairs for primary crawl entries, sorted by URL.
///
/// Only primary pages carry text, and the sort makes the document sequence
/// (and with it vector-space document ids) deterministic regardless of the
/// link map's iteration order.
pub fn primary_documents(link_map: &LinkMap) -> Vec<(String, String)> {
    let mut docs: Vec<(String, String)> = link_map
        .values()
        .filter_map(|entry| {
            entry
                .text
                .as_ref()
                .filter(|text| !text.is_empty())
                .map(|text| (entry.url.clone(), text.clone()))
        })
        .collect();
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaseek_crawler::result::CrawlEntry;

    fn entry(url: &str, text: Option<&str>) -> CrawlEntry {
        CrawlEntry {
            url: url.to_string(),
            text: text.map(|t| t.to_string()),
            outbound_links: Vec::new(),
        }
    }

    #[test]
    fn test_only_primary_entries_with_text() {
        let mut map = LinkMap::new();
        map.insert("http://b.com/".into(), entry("http://b.com/", Some("beta")));
        map.insert("http://a.com/".into(), entry("http://a.com/", Some("alpha")));
        map.insert("http://c.com/".into(), entry("http://c.com/", None));
        map.insert("http://d.com/".into(), entry("http://d.com/", Some("")));

        let docs = primary_documents(&map);
        assert_eq!(
            docs,
            vec![
                ("http://a.com/".to_string(), "alpha".to_string()),
                ("http://b.com/".to_string(), "beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_map() {
        assert!(primary_documents(&LinkMap::new()).is_empty());
    }
}
