//! Deterministic text-similarity math backing C5's `text_similarity` and
//! `category_similarities` computations: TF-IDF vectorization with cosine
//! similarity, plus plain Jaccard over token sets. None of this is an
//! injected backend — it is core, dependency-free arithmetic per §4.5.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const MAX_FEATURES: usize = 5000;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "this",
        "but", "they", "have", "had", "what", "when", "where", "who", "which", "why", "how",
        "all", "each", "other", "than", "then", "them", "these", "so", "can", "could", "would",
        "should", "not", "no", "do", "does", "did", "i", "you", "your", "we", "our", "their",
        "or", "if", "about", "into", "over", "after", "before", "between", "up", "down", "out",
    ]
    .into_iter()
    .collect()
});

/// Lowercases, strips non-alphanumeric characters, splits on whitespace, and
/// drops stop-words and single-character tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOP_WORDS.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

/// Unigrams plus bigrams, matching scikit-learn's `ngram_range=(1, 2)`.
fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut out: Vec<String> = tokens.to_vec();
    for window in tokens.windows(2) {
        out.push(format!("{} {}", window[0], window[1]));
    }
    out
}

/// Jaccard similarity over token sets: `|A ∩ B| / |A ∪ B|`. Returns 0.0 when
/// both sets are empty.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// A sparse TF-IDF vector over a shared vocabulary, keyed by term.
pub type SparseVector = HashMap<String, f64>;

/// Fits a TF-IDF vocabulary over the given documents (1-2 grams, English
/// stop-words already removed by `tokenize`), capped to the `MAX_FEATURES`
/// highest document-frequency terms, and returns one sparse vector per
/// document.
pub fn tfidf_vectors(documents: &[&str]) -> Vec<SparseVector> {
    let doc_terms: Vec<Vec<String>> = documents.iter().map(|d| ngrams(&tokenize(d))).collect();
    let n_docs = doc_terms.len();
    if n_docs == 0 {
        return Vec::new();
    }

    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    for terms in &doc_terms {
        let unique: HashSet<&String> = terms.iter().collect();
        for term in unique {
            *doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let mut vocabulary: Vec<(String, usize)> = doc_freq.into_iter().collect();
    vocabulary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    vocabulary.truncate(MAX_FEATURES);
    let idf: HashMap<&str, f64> = vocabulary
        .iter()
        .map(|(term, df)| {
            let value = ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0;
            (term.as_str(), value)
        })
        .collect();

    doc_terms
        .iter()
        .map(|terms| {
            let mut term_count: HashMap<&str, usize> = HashMap::new();
            for term in terms {
                if let Some((key, _)) = idf.get_key_value(term.as_str()) {
                    *term_count.entry(key).or_insert(0) += 1;
                }
            }
            let total = terms.len().max(1) as f64;
            let mut vector: SparseVector = term_count
                .into_iter()
                .map(|(term, count)| {
                    let tf = count as f64 / total;
                    (term.to_string(), tf * idf[term])
                })
                .collect();

            let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in vector.values_mut() {
                    *value /= norm;
                }
            }
            vector
        })
        .collect()
}

/// Cosine similarity between two sparse vectors, already L2-normalized by
/// `tfidf_vectors`. Returns 0.0 if either vector is empty.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    smaller
        .iter()
        .map(|(term, value)| value * larger.get(term).copied().unwrap_or(0.0))
        .sum()
}

/// Convenience wrapper for a one-off pairwise comparison: fits TF-IDF over
/// just the two documents and returns their cosine similarity.
pub fn text_cosine_similarity(a: &str, b: &str) -> f64 {
    let vectors = tfidf_vectors(&[a, b]);
    match (vectors.first(), vectors.get(1)) {
        (Some(va), Some(vb)) => cosine_similarity(va, vb),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_have_similarity_one() {
        let score = text_cosine_similarity(
            "Experienced Python developer with Django and AWS",
            "Experienced Python developer with Django and AWS",
        );
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_documents_have_similarity_zero() {
        let score = text_cosine_similarity("Python Django AWS backend engineer", "zzz yyy xxx qqq");
        assert!(score < 1e-6);
    }

    #[test]
    fn jaccard_handles_empty_sets() {
        let a: HashSet<String> = HashSet::new();
        let b: HashSet<String> = HashSet::new();
        assert_eq!(jaccard_similarity(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let a: HashSet<String> = ["python", "aws", "docker"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["python", "aws", "kubernetes"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard_similarity(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tokenize_drops_stopwords_and_short_tokens() {
        let tokens = tokenize("The cat is on a mat");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"a".to_string()));
        assert!(tokens.contains(&"cat".to_string()));
        assert!(tokens.contains(&"mat".to_string()));
    }
}
