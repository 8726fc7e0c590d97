//! Text tokenization and preprocessing
//!
//! This module provides tools for:
//! - Comment text cleaning and normalization
//! - Tokenization (splitting text into words)
//! - Stop word removal

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Tokenizer configuration and functionality
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Stop words to filter out
    stop_words: HashSet<String>,
    /// Minimum token length
    min_length: usize,
    /// Maximum token length
    max_length: usize,
    /// Convert to lowercase
    lowercase: bool,
    /// Remove numbers
    remove_numbers: bool,
    url_pattern: Regex,
    html_pattern: Regex,
    special_pattern: Regex,
    number_pattern: Regex,
    whitespace_pattern: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer with default English stop words
    pub fn new() -> Self {
        Self {
            stop_words: default_stop_words(),
            min_length: 2,
            max_length: 50,
            lowercase: true,
            remove_numbers: true,
            url_pattern: Regex::new(r"https?://\S+").unwrap(),
            html_pattern: Regex::new(r"<[^>]+>").unwrap(),
            special_pattern: Regex::new(r"[^\w\s]").unwrap(),
            number_pattern: Regex::new(r"\b\d+\b").unwrap(),
            whitespace_pattern: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Create a tokenizer tuned for video comment text
    ///
    /// Adds platform noise words that appear in almost every comment
    /// section and would otherwise dominate the vocabulary.
    pub fn for_comments() -> Self {
        let mut tokenizer = Self::new();
        tokenizer.add_stop_words(&[
            "video",
            "videos",
            "channel",
            "youtube",
            "subscribe",
            "subscribed",
            "like",
            "likes",
            "watch",
            "watching",
            "watched",
            "comment",
            "comments",
            "please",
            "plz",
            "thanks",
            "thank",
            "lol",
            "omg",
            "wow",
            "hey",
            "guys",
            "bro",
        ]);
        tokenizer
    }

    /// Add custom stop words
    pub fn add_stop_words(&mut self, words: &[&str]) {
        for word in words {
            self.stop_words.insert(word.to_lowercase());
        }
    }

    /// Set minimum token length
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Set maximum token length
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    /// Enable/disable lowercase conversion
    pub fn lowercase(mut self, enable: bool) -> Self {
        self.lowercase = enable;
        self
    }

    /// Enable/disable number removal
    pub fn remove_numbers(mut self, enable: bool) -> Self {
        self.remove_numbers = enable;
        self
    }

    /// Clean and normalize text
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = self.url_pattern.replace_all(text, " ").to_string();
        cleaned = self.html_pattern.replace_all(&cleaned, " ").to_string();
        cleaned = self.special_pattern.replace_all(&cleaned, " ").to_string();

        if self.remove_numbers {
            cleaned = self.number_pattern.replace_all(&cleaned, " ").to_string();
        }

        if self.lowercase {
            cleaned = cleaned.to_lowercase();
        }

        self.whitespace_pattern
            .replace_all(&cleaned, " ")
            .trim()
            .to_string()
    }

    /// Tokenize text into words
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);

        cleaned
            .unicode_words()
            .filter(|word| {
                let len = word.len();
                len >= self.min_length
                    && len <= self.max_length
                    && !self.stop_words.contains(&word.to_lowercase())
            })
            .map(|s| s.to_string())
            .collect()
    }

    /// Tokenize multiple documents
    pub fn tokenize_documents(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents.iter().map(|doc| self.tokenize(doc)).collect()
    }

    /// Get vocabulary with document frequencies, most frequent first
    pub fn vocabulary_with_frequencies(
        &self,
        tokenized_docs: &[Vec<String>],
    ) -> Vec<(String, usize)> {
        let mut doc_freq: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();

        for doc in tokenized_docs {
            let unique_tokens: HashSet<&String> = doc.iter().collect();
            for token in unique_tokens {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let mut vocab: Vec<(String, usize)> = doc_freq.into_iter().collect();
        vocab.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        vocab
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Default English stop words
fn default_stop_words() -> HashSet<String> {
    let words = [
        // Articles
        "a", "an", "the",
        // Pronouns
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those",
        // Verbs
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "would", "should", "could", "ought", "might", "must",
        "shall", "will", "can", "may",
        // Prepositions
        "at", "by", "for", "from", "in", "into", "of", "on", "to", "with", "about", "against",
        "between", "during", "before", "after", "above", "below", "up", "down", "out", "off",
        "over", "under", "again", "further", "then", "once",
        // Conjunctions
        "and", "but", "or", "nor", "so", "yet", "both", "either", "neither", "not", "only",
        "than", "when", "where", "while", "if", "because", "as", "until", "although",
        // Other common words
        "here", "there", "all", "each", "few", "more", "most", "other", "some", "such", "no",
        "any", "own", "same", "too", "very", "just", "also", "now", "how", "why", "well",
    ];

    words.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello World! This is a test.");

        assert!(!tokens.contains(&"a".to_string())); // Stop word
        assert!(!tokens.contains(&"is".to_string())); // Stop word
        assert!(tokens.contains(&"hello".to_string()));
        assert!(tokens.contains(&"world".to_string()));
        assert!(tokens.contains(&"test".to_string()));
    }

    #[test]
    fn test_tokenizer_for_comments() {
        let tokenizer = Tokenizer::for_comments();
        let tokens = tokenizer.tokenize("Great video, please subscribe to my channel!");

        assert!(!tokens.contains(&"video".to_string()));
        assert!(!tokens.contains(&"subscribe".to_string()));
        assert!(!tokens.contains(&"channel".to_string()));
        assert!(tokens.contains(&"great".to_string()));
    }

    #[test]
    fn test_clean_text() {
        let tokenizer = Tokenizer::new();
        let cleaned = tokenizer.clean("Visit https://example.com for <b>more</b> info!");

        assert!(!cleaned.contains("https://"));
        assert!(!cleaned.contains("<b>"));
        assert!(!cleaned.contains("!"));
        assert!(cleaned.contains("info"));
    }

    #[test]
    fn test_emoji_only_comment_tokenizes_to_nothing() {
        let tokenizer = Tokenizer::for_comments();
        assert!(tokenizer.tokenize("🔥🔥🔥 !!!").is_empty());
    }

    #[test]
    fn test_vocabulary_frequencies() {
        let tokenizer = Tokenizer::new();
        let docs = vec![
            "guitar lesson tutorial".to_string(),
            "guitar chord practice".to_string(),
            "piano lesson".to_string(),
        ];

        let tokenized = tokenizer.tokenize_documents(&docs);
        let vocab = tokenizer.vocabulary_with_frequencies(&tokenized);

        let guitar = vocab.iter().find(|(term, _)| term == "guitar");
        assert_eq!(guitar, Some(&("guitar".to_string(), 2)));
        assert!(vocab[0].1 >= vocab[vocab.len() - 1].1);
    }
}
