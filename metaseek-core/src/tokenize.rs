use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
            "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
            "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
            "doing", "down", "during", "each", "few", "for", "from", "further", "had",
            "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
            "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself",
            "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on",
            "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out",
            "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
            "the", "their", "theirs", "them", "themselves", "then", "there", "these",
            "they", "this", "those", "through", "to", "too", "under", "until", "up",
            "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
            "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
            "yourselves",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// Text-to-token pipeline feeding the vector-space index: case folding,
/// contraction expansion, punctuation stripping, stopword removal, and
/// Porter stemming. Deterministic for identical input; downstream code
/// treats the tokens as opaque strings.
pub struct Tokenizer {
    stemmer: Stemmer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        // Apostrophes become spaces so "don't" splits before the stopword
        // pass rather than surviving as a single unknown token.
        let folded = text.to_lowercase().replace('\'', " ");
        let cleaned: String = folded
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|word| !STOPWORDS.contains(word))
            .map(|word| self.stemmer.stem(word).to_string())
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
