//! K-means clustering
//!
//! Lloyd's algorithm with k-means++ initialization. A fixed random seed
//! makes repeated fits over the same matrix reproducible.

use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use thiserror::Error;

/// Errors that can occur during k-means computation
#[derive(Error, Debug)]
pub enum KMeansError {
    #[error("number of clusters must be positive")]
    InvalidClusterCount,

    #[error("{n_samples} samples is not enough for {n_clusters} clusters")]
    TooFewSamples { n_samples: usize, n_clusters: usize },

    #[error("feature matrix has no columns")]
    EmptyFeatureSpace,

    #[error("matrix dimensions do not match the fitted centroids")]
    DimensionMismatch,

    #[error("model not fitted yet")]
    NotFitted,
}

/// K-means model configuration
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub n_clusters: usize,
    /// Maximum number of Lloyd iterations
    pub max_iterations: usize,
    /// Convergence threshold on squared centroid movement
    pub tolerance: f64,
    /// Random seed for reproducibility
    pub random_seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            max_iterations: 100,
            tolerance: 1e-4,
            random_seed: None,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set maximum number of iterations
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Set convergence tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set random seed
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

/// K-means clustering model
#[derive(Debug)]
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,
    /// Cluster centers: n_clusters x n_features
    centroids: Option<Array2<f64>>,
    /// Per-sample cluster labels in input order
    labels: Option<Vec<usize>>,
    /// Within-cluster sum of squared distances
    inertia: Option<f64>,
    /// Iterations executed by the last fit
    n_iterations_run: usize,
}

impl KMeans {
    /// Create a new k-means model
    pub fn new(config: KMeansConfig) -> Result<Self, KMeansError> {
        if config.n_clusters == 0 {
            return Err(KMeansError::InvalidClusterCount);
        }

        Ok(Self {
            config,
            centroids: None,
            labels: None,
            inertia: None,
            n_iterations_run: 0,
        })
    }

    /// Create a simple model with just a cluster count
    pub fn simple(n_clusters: usize) -> Result<Self, KMeansError> {
        Self::new(KMeansConfig::new(n_clusters))
    }

    /// Fit the model on a feature matrix (samples x features)
    ///
    /// Requires at least as many samples as clusters and a non-empty
    /// feature space; the caller is expected to guard both conditions
    /// before building the matrix, these checks are the backstop.
    pub fn fit(&mut self, data: &Array2<f64>) -> Result<(), KMeansError> {
        let n_samples = data.nrows();
        let n_features = data.ncols();
        let k = self.config.n_clusters;

        if n_samples < k {
            return Err(KMeansError::TooFewSamples {
                n_samples,
                n_clusters: k,
            });
        }
        if n_features == 0 {
            return Err(KMeansError::EmptyFeatureSpace);
        }

        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut centroids = init_centroids(data, k, &mut rng);
        let mut labels = vec![0usize; n_samples];
        self.n_iterations_run = 0;

        for _ in 0..self.config.max_iterations {
            self.n_iterations_run += 1;

            for (i, label) in labels.iter_mut().enumerate() {
                *label = nearest_centroid(data.row(i), &centroids);
            }

            let mut sums = Array2::zeros((k, n_features));
            let mut counts = vec![0usize; k];
            for (i, &label) in labels.iter().enumerate() {
                sums.row_mut(label).zip_mut_with(&data.row(i), |a, &b| *a += b);
                counts[label] += 1;
            }

            // Empty clusters keep their previous centroid
            let mut max_shift = 0.0f64;
            for j in 0..k {
                if counts[j] == 0 {
                    continue;
                }
                let mut updated = sums.row(j).to_owned();
                updated.mapv_inplace(|v| v / counts[j] as f64);

                let shift = squared_distance(updated.view(), centroids.row(j));
                if shift > max_shift {
                    max_shift = shift;
                }
                centroids.row_mut(j).assign(&updated);
            }

            if max_shift <= self.config.tolerance {
                break;
            }
        }

        let mut inertia = 0.0;
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest_centroid(data.row(i), &centroids);
            inertia += squared_distance(data.row(i), centroids.row(*label));
        }

        self.centroids = Some(centroids);
        self.labels = Some(labels);
        self.inertia = Some(inertia);

        Ok(())
    }

    /// Per-sample cluster labels from the last fit, in input order
    pub fn labels(&self) -> Result<&[usize], KMeansError> {
        self.labels.as_deref().ok_or(KMeansError::NotFitted)
    }

    /// Cluster centers from the last fit
    pub fn centroids(&self) -> Result<&Array2<f64>, KMeansError> {
        self.centroids.as_ref().ok_or(KMeansError::NotFitted)
    }

    /// Within-cluster sum of squared distances from the last fit
    pub fn inertia(&self) -> Result<f64, KMeansError> {
        self.inertia.ok_or(KMeansError::NotFitted)
    }

    /// Iterations executed by the last fit
    pub fn n_iterations_run(&self) -> usize {
        self.n_iterations_run
    }

    /// Assign new samples to the nearest fitted centroid
    pub fn predict(&self, data: &Array2<f64>) -> Result<Vec<usize>, KMeansError> {
        let centroids = self.centroids.as_ref().ok_or(KMeansError::NotFitted)?;
        if data.ncols() != centroids.ncols() {
            return Err(KMeansError::DimensionMismatch);
        }

        Ok((0..data.nrows())
            .map(|i| nearest_centroid(data.row(i), centroids))
            .collect())
    }
}

/// K-means++ initialization: the first centroid is a uniformly random
/// sample, each further centroid is drawn with probability proportional
/// to its squared distance from the nearest centroid chosen so far.
fn init_centroids(data: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n_samples = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));

    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&data.row(first));

    let mut min_dists = vec![f64::INFINITY; n_samples];
    for c in 1..k {
        let latest = centroids.row(c - 1);
        for (i, min_dist) in min_dists.iter_mut().enumerate() {
            let dist = squared_distance(data.row(i), latest);
            if dist < *min_dist {
                *min_dist = dist;
            }
        }

        let total: f64 = min_dists.iter().sum();
        let chosen = if total > 0.0 {
            let mut threshold = rng.gen::<f64>() * total;
            let mut chosen = n_samples - 1;
            for (i, &dist) in min_dists.iter().enumerate() {
                threshold -= dist;
                if threshold <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // All samples coincide with a centroid already
            rng.gen_range(0..n_samples)
        };

        centroids.row_mut(c).assign(&data.row(chosen));
    }

    centroids
}

/// Index of the centroid nearest to the sample
fn nearest_centroid(sample: ArrayView1<f64>, centroids: &Array2<f64>) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (j, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_distance(sample, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }

    best
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> Array2<f64> {
        array![
            [0.0, 0.1],
            [0.1, 0.0],
            [0.0, 0.0],
            [10.0, 10.1],
            [10.1, 10.0],
            [10.0, 10.0],
        ]
    }

    #[test]
    fn test_separated_blobs_land_in_distinct_clusters() {
        let mut model = KMeans::new(KMeansConfig::new(2).random_seed(42)).unwrap();
        model.fit(&two_blobs()).unwrap();

        let labels = model.labels().unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_labels_are_in_cluster_range() {
        let data = Array2::from_shape_fn((12, 4), |(i, j)| ((i * 7 + j * 3) % 11) as f64);

        let mut model = KMeans::new(KMeansConfig::new(5).random_seed(42)).unwrap();
        model.fit(&data).unwrap();

        let labels = model.labels().unwrap();
        assert_eq!(labels.len(), 12);
        assert!(labels.iter().all(|&label| label < 5));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let data = Array2::from_shape_fn((20, 6), |(i, j)| ((i * 13 + j * 5) % 17) as f64);

        let mut first = KMeans::new(KMeansConfig::new(5).random_seed(42)).unwrap();
        first.fit(&data).unwrap();
        let mut second = KMeans::new(KMeansConfig::new(5).random_seed(42)).unwrap();
        second.fit(&data).unwrap();

        assert_eq!(first.labels().unwrap(), second.labels().unwrap());
        assert_eq!(first.inertia().unwrap(), second.inertia().unwrap());
    }

    #[test]
    fn test_too_few_samples() {
        let data = Array2::zeros((3, 4));
        let mut model = KMeans::simple(5).unwrap();

        let result = model.fit(&data);
        assert!(matches!(
            result,
            Err(KMeansError::TooFewSamples {
                n_samples: 3,
                n_clusters: 5
            })
        ));
    }

    #[test]
    fn test_empty_feature_space() {
        let data = Array2::zeros((6, 0));
        let mut model = KMeans::simple(2).unwrap();

        assert!(matches!(
            model.fit(&data),
            Err(KMeansError::EmptyFeatureSpace)
        ));
    }

    #[test]
    fn test_zero_clusters_rejected() {
        assert!(matches!(
            KMeans::simple(0),
            Err(KMeansError::InvalidClusterCount)
        ));
    }

    #[test]
    fn test_predict_matches_training_labels() {
        let data = two_blobs();
        let mut model = KMeans::new(KMeansConfig::new(2).random_seed(7)).unwrap();
        model.fit(&data).unwrap();

        assert_eq!(model.predict(&data).unwrap(), model.labels().unwrap());
    }

    #[test]
    fn test_accessors_before_fit() {
        let model = KMeans::simple(3).unwrap();
        assert!(matches!(model.labels(), Err(KMeansError::NotFitted)));
        assert!(matches!(model.inertia(), Err(KMeansError::NotFitted)));
    }
}
