//! Clustering models
//!
//! This module provides the k-means implementation used to partition
//! comment feature vectors into a fixed number of groups.

pub mod kmeans;
