//! # Comment clustering
//!
//! Library for collecting YouTube comments and grouping them into a
//! fixed number of clusters with TF-IDF features and k-means, while
//! tracking how the cluster counts evolve across repeated runs in one
//! session.
//!
//! ## Modules
//!
//! - `api` - YouTube Data API client
//! - `preprocessing` - tokenization and TF-IDF vectorization
//! - `models` - k-means clustering
//! - `history` - per-run snapshot history and trend
//! - `pipeline` - end-to-end orchestration
//! - `utils` - dataset I/O and terminal visualization

pub mod api;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod utils;

pub use api::youtube::YouTubeClient;
pub use history::{ClusterSnapshot, RunHistory};
pub use models::kmeans::{KMeans, KMeansConfig};
pub use pipeline::{AnalysisTarget, ClusterParams, CommentAnalyzer};
pub use preprocessing::tokenizer::Tokenizer;
pub use preprocessing::vectorizer::TfIdfVectorizer;
