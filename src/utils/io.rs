//! Dataset loading and saving
//!
//! Raw collector output can be saved as a named JSON dataset and loaded
//! back for offline experiments. The run history itself is deliberately
//! never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while saving or loading datasets
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named batch of collected comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDataset {
    /// Dataset name
    pub name: String,
    /// Where the comments came from
    pub source: String,
    /// When the batch was collected
    pub fetched_at: DateTime<Utc>,
    /// Comment text in collection order
    pub comments: Vec<String>,
}

impl CommentDataset {
    /// Create a dataset stamped with the current time
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        comments: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            fetched_at: Utc::now(),
            comments,
        }
    }

    /// Number of comments in the dataset
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Whether the dataset holds no comments
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Save as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved dataset
    pub fn load_json(path: &Path) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Create a directory and its parents if missing
pub fn ensure_directory(path: &Path) -> Result<(), DatasetError> {
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dataset = CommentDataset::new(
            "test_batch",
            "video vid-1",
            vec!["first".to_string(), "second".to_string()],
        );

        let path = std::env::temp_dir().join(format!(
            "comment_dataset_test_{}.json",
            std::process::id()
        ));
        dataset.save_json(&path).unwrap();
        let loaded = CommentDataset::load_json(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.name, dataset.name);
        assert_eq!(loaded.comments, dataset.comments);
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.is_empty());
    }
}
