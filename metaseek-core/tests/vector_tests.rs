// Tests for the TF-IDF vector-space ranker

use metaseek_core::vector::VectorSpace;

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn doc(key: &str, words: &[&str]) -> (String, Vec<String>) {
    (key.to_string(), tokens(words))
}

/// Two documents that both contain "dog": idf(dog) = log10(2/2) = 0, so
/// the query vector is all-zero and every document scores exactly 0.0,
/// falling back to insertion order.
#[test]
fn test_two_document_corpus_query_term_in_all_docs() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("A", &["cat", "dog"]),
        doc("B", &["dog", "dog", "fish"]),
    ]);

    let ranked = space.rank(&tokens(&["dog"]));
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].0, "A");
    assert_eq!(ranked[1].0, "B");
    assert!(ranked[0].1.abs() < 1e-6);
    assert!(ranked[1].1.abs() < 1e-6);
}

/// Adding a third document makes idf(dog) positive. B devotes a larger
/// share of its weight to "dog" than A does, so after unit normalization
/// B must outrank A; C lacks the term entirely and scores exactly zero.
#[test]
fn test_three_document_corpus_pinned_scores() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("A", &["cat", "dog"]),
        doc("B", &["dog", "dog", "fish"]),
        doc("C", &["cat", "fish"]),
    ]);

    let ranked = space.rank(&tokens(&["dog"]));
    assert_eq!(ranked.len(), 3);

    assert_eq!(ranked[0].0, "B");
    assert!((ranked[0].1 - 0.7928572719330476).abs() < 1e-6);

    assert_eq!(ranked[1].0, "A");
    assert!((ranked[1].1 - 0.7071067811865476).abs() < 1e-6);

    assert_eq!(ranked[2].0, "C");
    assert_eq!(ranked[2].1, 0.0);
}

#[test]
fn test_one_entry_per_document_scores_in_unit_range() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("A", &["rust", "crawler", "async"]),
        doc("B", &["rust", "parser"]),
        doc("C", &["garden", "tools"]),
        doc("D", &[]),
    ]);

    let ranked = space.rank(&tokens(&["rust", "crawler"]));
    assert_eq!(ranked.len(), 4);
    for (_, score) in &ranked {
        assert!(*score >= 0.0 && *score <= 1.0 + 1e-9);
    }
}

#[test]
fn test_document_with_term_outranks_document_without() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("with", &["ferret", "cage"]),
        doc("without", &["cage", "bird"]),
    ]);

    let ranked = space.rank(&tokens(&["ferret"]));
    assert_eq!(ranked[0].0, "with");
    assert!(ranked[0].1 > ranked[1].1);
    assert_eq!(ranked[1].1, 0.0);
}

#[test]
fn test_empty_query_yields_zero_scores_in_insertion_order() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("first", &["alpha"]),
        doc("second", &["beta"]),
        doc("third", &["gamma"]),
    ]);

    let ranked = space.rank(&[]);
    let keys: Vec<&str> = ranked.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["first", "second", "third"]);
    assert!(ranked.iter().all(|(_, s)| *s == 0.0));
}

#[test]
fn test_unknown_query_tokens_contribute_nothing() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![doc("A", &["known"]), doc("B", &["other"])]);

    let with_noise = space.rank(&tokens(&["known", "zzz-not-indexed"]));
    let without_noise = space.rank(&tokens(&["known"]));
    assert_eq!(with_noise, without_noise);
}

#[test]
fn test_fully_unknown_query_is_empty_query() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![doc("A", &["alpha"]), doc("B", &["beta"])]);

    let ranked = space.rank(&tokens(&["nothing", "matches"]));
    let keys: Vec<&str> = ranked.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert!(ranked.iter().all(|(_, s)| *s == 0.0));
}

#[test]
fn test_idf_cached_per_term() {
    let mut space = VectorSpace::new();
    space.set_documents(vec![
        doc("A", &["cat", "dog"]),
        doc("B", &["dog", "dog", "fish"]),
        doc("C", &["cat", "fish"]),
    ]);

    // idf = log10(3/2) for every term in this corpus.
    let expected = (3.0_f64 / 2.0).log10();
    for term in ["cat", "dog", "fish"] {
        assert!((space.cached_idf(term).unwrap() - expected).abs() < 1e-12);
        assert_eq!(space.document_frequency(term), 2);
    }
    assert!(space.cached_idf("absent").is_none());
}
