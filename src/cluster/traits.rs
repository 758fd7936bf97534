use crate::distance::weighted_squared_euclidean;
use crate::error::Result;

/// Result of partitioning a dataset into k hard clusters.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    /// Cluster index per input point, each in `0..centers.len()`.
    pub assignments: Vec<usize>,
    /// One representative vector per cluster (mean for k-means, medoid embedding for k-medoids).
    pub centers: Vec<Vec<f32>>,
    /// Data index of each cluster's medoid, for medoid-based strategies.
    pub medoids: Option<Vec<usize>>,
    /// Iterations run before stopping.
    pub iterations: usize,
    /// Whether the run stopped because nothing moved (as opposed to hitting the cap).
    pub converged: bool,
}

impl Partition {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centers.len()
    }

    /// Member count per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &label in &self.assignments {
            sizes[label] += 1;
        }
        sizes
    }

    /// Sum of squared (weighted) distances from each point to its cluster center.
    pub fn sse(&self, data: &[Vec<f32>], weights: &[f32]) -> f32 {
        data.iter()
            .zip(&self.assignments)
            .map(|(point, &label)| weighted_squared_euclidean(point, &self.centers[label], weights))
            .filter(|v| v.is_finite())
            .sum()
    }
}

/// Common interface for the hard partitioning strategies.
pub trait Partitioner {
    /// Partition `data` under the attribute `weights`.
    ///
    /// `seeds`, when present and shaped `k × dim`, replace random initialization so that
    /// reclustering with an unchanged `k` keeps cluster identities stable.
    fn partition(
        &self,
        data: &[Vec<f32>],
        weights: &[f32],
        seeds: Option<&[Vec<f32>]>,
    ) -> Result<Partition>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}
