// Tests for domain graph construction

use metaseek_core::graph::{DomainGraph, registrable_domain};
use metaseek_crawler::result::{CrawlEntry, LinkMap};

fn entry(url: &str, outbound: &[&str]) -> CrawlEntry {
    CrawlEntry {
        url: url.to_string(),
        text: None,
        outbound_links: outbound.iter().map(|l| l.to_string()).collect(),
    }
}

fn link_map(entries: Vec<CrawlEntry>) -> LinkMap {
    entries.into_iter().map(|e| (e.url.clone(), e)).collect()
}

#[test]
fn test_cross_domain_edges_recorded() {
    let map = link_map(vec![
        entry("http://alpha.com/", &["http://beta.org/page"]),
        entry("http://beta.org/page", &["http://gamma.net/"]),
    ]);

    let graph = DomainGraph::from_link_map(&map);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.contains_edge("alpha.com", "beta.org"));
    assert!(graph.contains_edge("beta.org", "gamma.net"));
    assert!(!graph.contains_edge("alpha.com", "gamma.net"));
}

#[test]
fn test_no_self_loops_across_subdomains() {
    // Different hosts, same registrable domain: never an edge.
    let map = link_map(vec![entry(
        "http://blog.example.com/",
        &["http://shop.example.com/item"],
    )]);

    let graph = DomainGraph::from_link_map(&map);
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_duplicate_edges_collapse() {
    let map = link_map(vec![
        entry(
            "http://alpha.com/one",
            &["http://beta.org/x", "http://beta.org/y"],
        ),
        entry("http://alpha.com/two", &["http://beta.org/z"]),
    ]);

    let graph = DomainGraph::from_link_map(&map);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_subdomains_collapse_to_one_node() {
    let map = link_map(vec![
        entry("http://www.alpha.com/", &["http://beta.org/"]),
        entry("http://news.alpha.com/", &["http://beta.org/"]),
    ]);

    let graph = DomainGraph::from_link_map(&map);
    assert_eq!(graph.node_count(), 2);
    assert!(graph.contains_edge("alpha.com", "beta.org"));
}

#[test]
fn test_node_order_deterministic() {
    let map = link_map(vec![
        entry("http://zeta.com/", &["http://alpha.com/"]),
        entry("http://mid.net/", &["http://zeta.com/", "http://alpha.com/"]),
        entry("http://alpha.com/", &["http://mid.net/"]),
    ]);

    let first = DomainGraph::from_link_map(&map).node_order();
    let second = DomainGraph::from_link_map(&map).node_order();
    assert_eq!(first, second);
    // Sorted-URL walk: alpha.com is seen first as a parent.
    assert_eq!(first[0], "alpha.com");
}

#[test]
fn test_matrix_matches_edges() {
    let map = link_map(vec![
        entry("http://alpha.com/", &["http://beta.org/"]),
        entry("http://beta.org/", &["http://alpha.com/"]),
    ]);

    let graph = DomainGraph::from_link_map(&map);
    let order = graph.node_order();
    let matrix = graph.to_matrix();

    assert_eq!(matrix.len(), order.len());
    let a = order.iter().position(|d| d == "alpha.com").unwrap();
    let b = order.iter().position(|d| d == "beta.org").unwrap();
    assert_eq!(matrix[a][b], 1.0);
    assert_eq!(matrix[b][a], 1.0);
    assert_eq!(matrix[a][a], 0.0);
    assert_eq!(matrix[b][b], 0.0);
}

#[test]
fn test_empty_link_map() {
    let graph = DomainGraph::from_link_map(&LinkMap::new());
    assert_eq!(graph.node_count(), 0);
    assert!(graph.to_matrix().is_empty());
}

#[test]
fn test_registrable_domain_used_for_nodes() {
    assert_eq!(
        registrable_domain("https://api.service.example.co.uk/v1"),
        Some("example.co.uk".to_string())
    );
}
