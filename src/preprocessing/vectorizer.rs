//! Text vectorization
//!
//! Converts tokenized comments into TF-IDF feature matrices suitable
//! for clustering.

use hashbrown::HashMap;
use ndarray::Array2;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during vectorization
#[derive(Error, Debug)]
pub enum VectorizerError {
    #[error("vectorizer has not been fitted")]
    NotFitted,

    #[error("vocabulary is empty after preprocessing and frequency filtering")]
    EmptyVocabulary,
}

/// TF-IDF vectorizer
///
/// Builds a document-frequency-filtered vocabulary over a corpus and
/// produces L2-normalized TF-IDF rows, one per document. IDF is smoothed
/// as `ln(N / (1 + df)) + 1` so unseen frequencies never divide by zero.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> column index
    vocabulary: HashMap<String, usize>,
    /// Inverse vocabulary: column index -> term
    terms: Vec<String>,
    /// IDF value per term (computed during fit)
    idf_values: Vec<f64>,
    /// Number of documents seen during fitting
    n_documents: usize,
    /// Minimum document frequency for term inclusion
    min_df: usize,
    /// Maximum document frequency ratio for term inclusion
    max_df_ratio: f64,
    /// Maximum vocabulary size
    max_features: Option<usize>,
    /// Whether the vectorizer has been fitted
    is_fitted: bool,
}

impl TfIdfVectorizer {
    /// Create a new vectorizer with default settings
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf_values: Vec::new(),
            n_documents: 0,
            min_df: 1,
            max_df_ratio: 1.0,
            max_features: None,
            is_fitted: false,
        }
    }

    /// Set minimum document frequency
    pub fn min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Set maximum document frequency ratio
    pub fn max_df_ratio(mut self, ratio: f64) -> Self {
        self.max_df_ratio = ratio;
        self
    }

    /// Set maximum vocabulary size
    pub fn max_features(mut self, max: usize) -> Self {
        self.max_features = Some(max);
        self
    }

    /// Fit the vectorizer on tokenized documents
    ///
    /// Fails with [`VectorizerError::EmptyVocabulary`] when no term
    /// survives preprocessing and frequency filtering, which happens when
    /// the corpus is empty or every comment cleans down to nothing.
    pub fn fit(&mut self, tokenized_docs: &[Vec<String>]) -> Result<(), VectorizerError> {
        self.n_documents = tokenized_docs.len();

        let mut term_doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in tokenized_docs {
            let unique_terms: HashSet<&String> = doc.iter().collect();
            for term in unique_terms {
                *term_doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let max_df = (self.n_documents as f64 * self.max_df_ratio).ceil() as usize;
        let mut filtered_terms: Vec<(String, usize)> = term_doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_df)
            .collect();

        // Keep the most frequent terms when capped, then order the
        // vocabulary alphabetically so column indices are deterministic
        filtered_terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(max) = self.max_features {
            filtered_terms.truncate(max);
        }
        filtered_terms.sort_by(|a, b| a.0.cmp(&b.0));

        if filtered_terms.is_empty() {
            self.is_fitted = false;
            return Err(VectorizerError::EmptyVocabulary);
        }

        self.vocabulary.clear();
        self.terms.clear();
        self.idf_values.clear();

        let n = self.n_documents as f64;
        for (idx, (term, df)) in filtered_terms.into_iter().enumerate() {
            self.vocabulary.insert(term.clone(), idx);
            self.terms.push(term);
            self.idf_values.push((n / (1.0 + df as f64)).ln() + 1.0);
        }

        self.is_fitted = true;
        Ok(())
    }

    /// Transform tokenized documents into a TF-IDF matrix
    ///
    /// Returns a matrix of shape (n_documents, n_terms) with each
    /// non-zero row L2-normalized.
    pub fn transform(&self, tokenized_docs: &[Vec<String>]) -> Result<Array2<f64>, VectorizerError> {
        if !self.is_fitted {
            return Err(VectorizerError::NotFitted);
        }

        let n_docs = tokenized_docs.len();
        let n_terms = self.terms.len();
        let mut matrix = Array2::zeros((n_docs, n_terms));

        for (doc_idx, doc) in tokenized_docs.iter().enumerate() {
            let mut term_counts: HashMap<&String, usize> = HashMap::new();
            for term in doc {
                *term_counts.entry(term).or_insert(0) += 1;
            }

            for (term, &count) in &term_counts {
                if let Some(&term_idx) = self.vocabulary.get(*term) {
                    matrix[[doc_idx, term_idx]] = count as f64 * self.idf_values[term_idx];
                }
            }

            let norm: f64 = matrix
                .row(doc_idx)
                .iter()
                .map(|value| value * value)
                .sum::<f64>()
                .sqrt();
            if norm > 0.0 {
                matrix.row_mut(doc_idx).mapv_inplace(|value| value / norm);
            }
        }

        Ok(matrix)
    }

    /// Fit and transform in one step
    pub fn fit_transform(
        &mut self,
        tokenized_docs: &[Vec<String>],
    ) -> Result<Array2<f64>, VectorizerError> {
        self.fit(tokenized_docs)?;
        self.transform(tokenized_docs)
    }

    /// Get the vocabulary
    pub fn get_vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Get term by column index
    pub fn get_term(&self, index: usize) -> Option<&String> {
        self.terms.get(index)
    }

    /// Get vocabulary size
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|doc| doc.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_fit_transform_shape() {
        let corpus = docs(&[
            &["guitar", "lesson"],
            &["piano", "lesson", "beginner"],
            &["guitar", "solo"],
        ]);

        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        assert_eq!(matrix.nrows(), 3);
        assert_eq!(matrix.ncols(), vectorizer.vocabulary_size());
        assert!(vectorizer.vocabulary_size() >= 5);
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let corpus = docs(&[&["alpha", "beta"], &["beta", "gamma", "gamma"]]);

        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        for row in matrix.rows() {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_corpus_is_empty_vocabulary() {
        let mut vectorizer = TfIdfVectorizer::new();
        let result = vectorizer.fit(&[]);
        assert!(matches!(result, Err(VectorizerError::EmptyVocabulary)));
    }

    #[test]
    fn test_all_empty_documents_is_empty_vocabulary() {
        let corpus = docs(&[&[], &[], &[]]);
        let mut vectorizer = TfIdfVectorizer::new();
        let result = vectorizer.fit_transform(&corpus);
        assert!(matches!(result, Err(VectorizerError::EmptyVocabulary)));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = TfIdfVectorizer::new();
        let result = vectorizer.transform(&docs(&[&["term"]]));
        assert!(matches!(result, Err(VectorizerError::NotFitted)));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let corpus = docs(&[
            &["common", "rare1"],
            &["common", "rare2"],
            &["common", "rare3"],
        ]);

        let mut vectorizer = TfIdfVectorizer::new().max_features(1);
        vectorizer.fit(&corpus).unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert_eq!(vectorizer.get_term(0), Some(&"common".to_string()));
    }
}
