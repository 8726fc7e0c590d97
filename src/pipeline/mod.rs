//! End-to-end analysis pipeline
//!
//! Drives one run: resolve the target to a video list, collect all
//! top-level comments, vectorize and cluster them, and record a
//! timestamped snapshot in the session history. Each stage only passes
//! its output forward; a failure anywhere ends the run with a single
//! reported error.

use chrono::Utc;
use thiserror::Error;

use crate::api::youtube::{YouTubeClient, YouTubeError};
use crate::history::{ClusterSnapshot, HistoryError, RunHistory};
use crate::models::kmeans::{KMeans, KMeansConfig, KMeansError};
use crate::preprocessing::tokenizer::Tokenizer;
use crate::preprocessing::vectorizer::TfIdfVectorizer;

/// Source of videos and comments, the seam between the pipeline and the
/// upstream API
///
/// Implementations report request rejections (bad ids, disabled
/// comments) as empty collections and reserve errors for failures that
/// must abort the run.
pub trait CommentSource {
    fn list_channel_videos(&self, channel_id: &str) -> Result<Vec<String>, YouTubeError>;
    fn list_video_comments(&self, video_id: &str) -> Result<Vec<String>, YouTubeError>;
}

impl CommentSource for YouTubeClient {
    fn list_channel_videos(&self, channel_id: &str) -> Result<Vec<String>, YouTubeError> {
        YouTubeClient::list_channel_videos(self, channel_id)
    }

    fn list_video_comments(&self, video_id: &str) -> Result<Vec<String>, YouTubeError> {
        YouTubeClient::list_video_comments(self, video_id)
    }
}

/// What one analysis run is scoped to
///
/// A channel target is resolved to the channel's video list; a video
/// target is the one-element list. Both then share the per-video
/// comment-fetch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisTarget {
    Channel(String),
    Video(String),
}

/// Clustering parameters for a run
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Number of clusters
    pub n_clusters: usize,
    /// Seed for reproducible clustering of identical input
    pub random_seed: u64,
    /// Maximum k-means iterations
    pub max_iterations: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            random_seed: 42,
            max_iterations: 100,
        }
    }
}

/// Errors that end an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no videos found for the requested channel")]
    NoVideosFound,

    #[error("no comments found for the requested target")]
    NoCommentsFound,

    #[error("cannot analyze: {collected} comments collected, at least {required} required")]
    TooFewComments { collected: usize, required: usize },

    #[error("cannot analyze: comments contain no usable vocabulary")]
    EmptyVocabulary,

    #[error(transparent)]
    Api(#[from] YouTubeError),

    #[error("clustering failed: {0}")]
    Clustering(#[from] KMeansError),

    #[error("recording failed: {0}")]
    Recording(#[from] HistoryError),
}

/// Comments gathered for one run
#[derive(Debug, Clone)]
pub struct CollectedComments {
    pub comments: Vec<String>,
    pub videos_scanned: usize,
}

/// Result of one successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Collected comment text, in collection order
    pub comments: Vec<String>,
    /// Cluster label per comment, parallel to `comments`
    pub labels: Vec<usize>,
    /// Per-cluster tally recorded into the history
    pub snapshot: ClusterSnapshot,
    /// Videos the collector walked
    pub videos_scanned: usize,
    /// Terms that survived preprocessing
    pub vocabulary_size: usize,
}

/// Orchestrates collect -> cluster -> record for one target at a time
pub struct CommentAnalyzer<S> {
    source: S,
    tokenizer: Tokenizer,
    params: ClusterParams,
}

impl<S: CommentSource> CommentAnalyzer<S> {
    /// Create an analyzer with default comment tokenization and
    /// clustering parameters
    pub fn new(source: S) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::for_comments(),
            params: ClusterParams::default(),
        }
    }

    /// Override the clustering parameters
    pub fn with_params(mut self, params: ClusterParams) -> Self {
        self.params = params;
        self
    }

    /// Override the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Clustering parameters in effect
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Collect all top-level comments for the target
    ///
    /// `progress(completed, total)` is invoked once per fully fetched
    /// video; in single-video mode that is exactly once.
    pub fn collect_comments(
        &self,
        target: &AnalysisTarget,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<CollectedComments, AnalysisError> {
        let video_ids = match target {
            AnalysisTarget::Channel(channel_id) => {
                let videos = self.source.list_channel_videos(channel_id)?;
                if videos.is_empty() {
                    return Err(AnalysisError::NoVideosFound);
                }
                videos
            }
            AnalysisTarget::Video(video_id) => vec![video_id.clone()],
        };

        let total = video_ids.len();
        let mut comments = Vec::new();
        for (i, video_id) in video_ids.iter().enumerate() {
            comments.extend(self.source.list_video_comments(video_id)?);
            progress(i + 1, total);
        }

        if comments.is_empty() {
            return Err(AnalysisError::NoCommentsFound);
        }

        Ok(CollectedComments {
            comments,
            videos_scanned: total,
        })
    }

    /// Run the full pipeline once and record the outcome in `history`
    ///
    /// The history is only appended to on success; every failure leaves
    /// it untouched. Too little data is detected before clustering is
    /// attempted.
    pub fn run(
        &self,
        target: &AnalysisTarget,
        history: &mut RunHistory,
        progress: impl FnMut(usize, usize),
    ) -> Result<RunReport, AnalysisError> {
        let collected = self.collect_comments(target, progress)?;

        let required = self.params.n_clusters;
        if collected.comments.len() < required {
            return Err(AnalysisError::TooFewComments {
                collected: collected.comments.len(),
                required,
            });
        }

        let tokenized = self.tokenizer.tokenize_documents(&collected.comments);
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer
            .fit_transform(&tokenized)
            .map_err(|_| AnalysisError::EmptyVocabulary)?;

        let config = KMeansConfig::new(self.params.n_clusters)
            .max_iterations(self.params.max_iterations)
            .random_seed(self.params.random_seed);
        let mut model = KMeans::new(config)?;
        model.fit(&matrix)?;
        let labels = model.labels()?.to_vec();

        history.record_snapshot(&labels, Utc::now())?;
        let snapshot = history
            .entries()
            .last()
            .map(|entry| entry.snapshot.clone())
            .unwrap_or_else(|| ClusterSnapshot::zeroed(required));

        Ok(RunReport {
            comments: collected.comments,
            labels,
            snapshot,
            videos_scanned: collected.videos_scanned,
            vocabulary_size: vectorizer.vocabulary_size(),
        })
    }
}
