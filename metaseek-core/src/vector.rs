use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// TF-IDF vector-space index over tokenized documents.
///
/// Document ids are assigned in the order documents are supplied and all
/// outputs preserve that order for equal scores. The IDF table is computed
/// once at build time and reused for query vectorization; queries never
/// recompute document frequencies.
#[derive(Debug, Default)]
pub struct VectorSpace {
    /// term -> document id -> raw term frequency. Absence means zero.
    inverted_index: HashMap<String, HashMap<usize, usize>>,
    /// Unit-normalized TF-IDF vectors, indexed by document id. Documents
    /// with no indexed terms keep an empty vector.
    doc_vectors: Vec<HashMap<String, f64>>,
    doc_keys: Vec<String>,
    idf: HashMap<String, f64>,
}

fn tf_weight(freq: usize) -> f64 {
    if freq > 0 {
        1.0 + (freq as f64).log10()
    } else {
        0.0
    }
}

fn idf_weight(total_docs: usize, doc_freq: usize) -> f64 {
    if doc_freq > 0 {
        (total_docs as f64 / doc_freq as f64).log10()
    } else {
        0.0
    }
}

fn l2_norm(vector: &HashMap<String, f64>) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

impl VectorSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document collection, replacing any previous index.
    pub fn set_documents(&mut self, docs: Vec<(String, Vec<String>)>) {
        self.inverted_index.clear();
        self.doc_vectors.clear();
        self.doc_keys.clear();
        self.idf.clear();

        let total_docs = docs.len();

        for (doc_id, (key, tokens)) in docs.into_iter().enumerate() {
            self.doc_keys.push(key);

            let mut term_freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *term_freqs.entry(token).or_insert(0) += 1;
            }

            let mut vector = HashMap::new();
            for (term, freq) in term_freqs {
                vector.insert(term.clone(), tf_weight(freq));
                self.inverted_index
                    .entry(term)
                    .or_default()
                    .insert(doc_id, freq);
            }
            self.doc_vectors.push(vector);
        }

        for (term, postings) in &self.inverted_index {
            self.idf
                .insert(term.clone(), idf_weight(total_docs, postings.len()));
        }

        for vector in &mut self.doc_vectors {
            for (term, weight) in vector.iter_mut() {
                *weight *= self.idf[term];
            }
            let norm = l2_norm(vector);
            if norm > 0.0 {
                for weight in vector.values_mut() {
                    *weight /= norm;
                }
            }
        }

        debug!(
            "Indexed {} document(s), {} distinct term(s)",
            self.doc_keys.len(),
            self.inverted_index.len()
        );
    }

    /// Score every document against the query by cosine similarity.
    ///
    /// Query tokens absent from the corpus contribute nothing. Documents
    /// sharing no term with the query score exactly 0.0 and are still
    /// returned. The result is sorted by descending score; ties keep
    /// document insertion order. An empty or corpus-foreign query yields
    /// every document at 0.0 in insertion order.
    pub fn rank(&self, query_tokens: &[String]) -> Vec<(String, f64)> {
        let mut query_freqs: HashMap<&str, usize> = HashMap::new();
        for token in query_tokens {
            *query_freqs.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut query_vector: HashMap<&str, f64> = HashMap::new();
        for (term, freq) in query_freqs {
            if let Some(idf) = self.idf.get(term) {
                query_vector.insert(term, tf_weight(freq) * idf);
            }
        }

        if query_vector.is_empty() {
            return self.doc_keys.iter().map(|key| (key.clone(), 0.0)).collect();
        }

        let norm = query_vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in query_vector.values_mut() {
                *weight /= norm;
            }
        }

        let mut scored: Vec<(String, f64)> = self
            .doc_keys
            .iter()
            .zip(self.doc_vectors.iter())
            .map(|(key, vector)| {
                let score = query_vector
                    .iter()
                    .map(|(term, query_weight)| {
                        query_weight * vector.get(*term).copied().unwrap_or(0.0)
                    })
                    .sum();
                (key.clone(), score)
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
    }

    /// The IDF weight cached at build time, if the term was indexed.
    pub fn cached_idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Number of documents containing the term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.inverted_index
            .get(term)
            .map(|postings| postings.len())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.doc_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tf_weight() {
        assert_eq!(tf_weight(0), 0.0);
        assert_eq!(tf_weight(1), 1.0);
        assert!((tf_weight(10) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_document_vectors_are_unit_length() {
        let mut space = VectorSpace::new();
        space.set_documents(vec![
            ("a".to_string(), tokens(&["cat", "dog"])),
            ("b".to_string(), tokens(&["fish"])),
        ]);

        for vector in &space.doc_vectors {
            if !vector.is_empty() {
                assert!((l2_norm(vector) - 1.0).abs() < 1e-9);
            }
        }
    }

    /// Query scoring must rely on the IDF cache built at index time, not
    /// on the live index contents: corrupting the raw postings after the
    /// build leaves every query score unchanged.
    #[test]
    fn test_query_uses_cached_idf_not_live_postings() {
        let mut space = VectorSpace::new();
        space.set_documents(vec![
            ("a".to_string(), tokens(&["cat", "dog"])),
            ("b".to_string(), tokens(&["dog", "dog", "fish"])),
            ("c".to_string(), tokens(&["cat", "fish"])),
        ]);

        let query = tokens(&["dog", "fish"]);
        let before = space.rank(&query);

        for postings in space.inverted_index.values_mut() {
            for freq in postings.values_mut() {
                *freq += 100;
            }
        }

        let after = space.rank(&query);
        assert_eq!(before, after);
    }
}
