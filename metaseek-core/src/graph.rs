use metaseek_crawler::result::LinkMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use url::{Host, Url};

/// Multi-label public suffixes the corpus of crawled sites actually hits.
/// Anything else falls back to the last two host labels.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "co.jp", "ne.jp", "or.jp", "com.au",
    "net.au", "org.au", "co.nz", "co.in", "com.br", "com.cn", "com.mx", "com.sg", "co.za",
    "com.ar", "com.tr", "co.kr",
];

/// The registrable domain (eTLD+1) of a URL: public suffix plus one label,
/// so every subdomain of a site collapses to one graph node. IP hosts and
/// single-label hosts (e.g. `localhost`) are used as-is; ports are ignored.
pub fn registrable_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host()? {
        Host::Ipv4(addr) => return Some(addr.to_string()),
        Host::Ipv6(addr) => return Some(addr.to_string()),
        Host::Domain(_) => {}
    }

    let host = parsed.host_str()?.to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return Some(host);
    }

    let last_two = labels[labels.len() - 2..].join(".");
    if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        Some(labels[labels.len() - 3..].join("."))
    } else {
        Some(last_two)
    }
}

/// Directed graph over registrable domains: an edge A → B means some page
/// on domain A links to a page on domain B. Self-loops are excluded and
/// duplicate edges collapse, so the structure is exactly the cross-domain
/// citation pattern of the crawl.
#[derive(Debug, Default)]
pub struct DomainGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl DomainGraph {
    /// Build the graph from a crawl's link map.
    ///
    /// Entries are walked in sorted-URL order so node discovery, and with
    /// it `node_order`, is deterministic regardless of map iteration order.
    pub fn from_link_map(link_map: &LinkMap) -> Self {
        let mut graph = Self::default();

        let mut urls: Vec<&String> = link_map.keys().collect();
        urls.sort();

        for url in urls {
            let entry = &link_map[url];
            let Some(parent) = registrable_domain(url) else {
                continue;
            };

            for link in &entry.outbound_links {
                let Some(child) = registrable_domain(link) else {
                    continue;
                };
                // Distinct hosts can still share a registrable domain;
                // those links never become edges.
                if child == parent {
                    continue;
                }
                graph.add_edge(&parent, &child);
            }
        }

        graph
    }

    fn ensure_node(&mut self, domain: &str) -> NodeIndex {
        if let Some(&index) = self.indices.get(domain) {
            return index;
        }
        let index = self.graph.add_node(domain.to_string());
        self.indices.insert(domain.to_string(), index);
        index
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    /// Stable first-seen node ordering; the indexing key for `to_matrix`
    /// and for PageRank scores.
    pub fn node_order(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|index| self.graph[index].clone())
            .collect()
    }

    /// The 0/1 adjacency matrix over `node_order`: `m[i][j] = 1.0` iff
    /// edge i → j exists.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.graph.node_count();
        let mut matrix = vec![vec![0.0; n]; n];
        for edge in self.graph.edge_references() {
            matrix[edge.source().index()][edge.target().index()] = 1.0;
        }
        matrix
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.indices.get(from), self.indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_domain_strips_subdomains() {
        assert_eq!(
            registrable_domain("https://www.example.com/page"),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_domain("https://deep.sub.example.com/"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_registrable_domain_multi_label_suffix() {
        assert_eq!(
            registrable_domain("https://news.example.co.uk/story"),
            Some("example.co.uk".to_string())
        );
    }

    #[test]
    fn test_registrable_domain_bare_hosts() {
        assert_eq!(
            registrable_domain("http://localhost:8090/search"),
            Some("localhost".to_string())
        );
        assert_eq!(
            registrable_domain("http://192.168.1.10:8080/"),
            Some("192.168.1.10".to_string())
        );
    }

    #[test]
    fn test_registrable_domain_invalid_url() {
        assert_eq!(registrable_domain("not a url"), None);
    }
}
