//! K-means over the attribute-weighted Euclidean metric.
//!
//! Lloyd iterations: assign each point to its nearest center (ties go to the lowest
//! index), then move each center to the per-dimension mean of its points. Stops when
//! no center moves or when the iteration cap is reached. Reaching the cap is not an
//! error; the last state is returned with `converged == false`.
//!
//! Initialization is a uniform sample of `k` distinct data points. Callers that
//! recluster with an unchanged `k` pass the previous centers as seeds instead, which
//! keeps cluster indices (and therefore colors and hull identities) stable.

use rand::prelude::*;
use tracing::{debug, trace};

use super::traits::{Partition, Partitioner};
use super::util::{cluster_means, nearest_center, usable_seeds, validate_request};
use crate::error::{Error, Result};

/// K-means partitioner.
#[derive(Clone, Debug)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    restarts: usize,
    seed: Option<u64>,
}

impl Kmeans {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITER: usize = 10_000;

    /// Create a k-means partitioner for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: Self::DEFAULT_MAX_ITER,
            restarts: 1,
            seed: None,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Number of random initializations tried when no seeds are given; the run with
    /// the lowest SSE wins.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Seed the RNG used for initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }

    fn sample_centers(&self, rng: &mut dyn RngCore, data: &[Vec<f32>]) -> Vec<Vec<f32>> {
        rand::seq::index::sample(rng, data.len(), self.k)
            .into_iter()
            .map(|i| data[i].clone())
            .collect()
    }

    fn lloyd(&self, data: &[Vec<f32>], weights: &[f32], mut centers: Vec<Vec<f32>>) -> Partition {
        let mut assignments = vec![0usize; data.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            for (label, point) in assignments.iter_mut().zip(data) {
                *label = nearest_center(point, &centers, weights);
            }

            let next = cluster_means(data, &assignments, &centers);
            let moved = next != centers;
            centers = next;

            if !moved {
                converged = true;
                break;
            }
        }

        Partition {
            assignments,
            centers,
            medoids: None,
            iterations,
            converged,
        }
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Partitioner for Kmeans {
    fn partition(
        &self,
        data: &[Vec<f32>],
        weights: &[f32],
        seeds: Option<&[Vec<f32>]>,
    ) -> Result<Partition> {
        let d = validate_request(data, weights, self.k)?;
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let fit = if let Some(seeds) = usable_seeds(seeds, self.k, d) {
            trace!(k = self.k, "k-means seeded from previous centers");
            self.lloyd(data, weights, seeds.to_vec())
        } else {
            let mut rng = self.rng();
            let mut best = self.lloyd(data, weights, self.sample_centers(&mut *rng, data));
            let mut best_sse = best.sse(data, weights);
            for _ in 1..self.restarts {
                let fit = self.lloyd(data, weights, self.sample_centers(&mut *rng, data));
                let sse = fit.sse(data, weights);
                if sse < best_sse {
                    best = fit;
                    best_sse = sse;
                }
            }
            best
        };

        if fit.converged {
            debug!(k = self.k, iterations = fit.iterations, "k-means converged");
        } else {
            debug!(k = self.k, iterations = fit.iterations, "k-means hit iteration cap");
        }
        Ok(fit)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_pairs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![5.0, 5.0],
            vec![5.0, 6.0],
        ]
    }

    #[test]
    fn three_pairs_split_by_proximity() {
        let data = three_pairs();
        let fit = Kmeans::new(3)
            .with_seed(42)
            .with_restarts(32)
            .partition(&data, &[1.0, 1.0], None)
            .unwrap();

        assert_eq!(fit.cluster_sizes(), vec![2, 2, 2]);
        assert_eq!(fit.assignments[0], fit.assignments[1]);
        assert_eq!(fit.assignments[2], fit.assignments[3]);
        assert_eq!(fit.assignments[4], fit.assignments[5]);
        assert!(fit.converged);
        // Within-pair spread is 0.5 from the mean along one axis: 6 * 0.25.
        assert!((fit.sse(&data, &[1.0, 1.0]) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn seeds_fix_cluster_order() {
        let data = three_pairs();
        let seeds = vec![vec![5.0, 5.0], vec![10.0, 10.0], vec![0.0, 0.0]];
        let fit = Kmeans::new(3)
            .partition(&data, &[1.0, 1.0], Some(&seeds[..]))
            .unwrap();

        assert_eq!(fit.assignments, vec![2, 2, 1, 1, 0, 0]);
        assert_eq!(fit.centers[0], vec![5.0, 5.5]);
        assert_eq!(fit.centers[2], vec![0.0, 0.5]);
    }

    #[test]
    fn reseeding_with_converged_centers_is_stable() {
        let data = three_pairs();
        let first = Kmeans::new(3)
            .with_seed(7)
            .partition(&data, &[1.0, 1.0], None)
            .unwrap();
        assert!(first.converged);

        let second = Kmeans::new(3)
            .partition(&data, &[1.0, 1.0], Some(&first.centers[..]))
            .unwrap();
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.centers, second.centers);
        assert_eq!(second.iterations, 1);
    }

    #[test]
    fn iteration_cap_is_not_an_error() {
        let data = three_pairs();
        let seeds = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 10.0]];
        let fit = Kmeans::new(3)
            .with_max_iter(1)
            .partition(&data, &[1.0, 1.0], Some(&seeds[..]))
            .unwrap();
        assert_eq!(fit.iterations, 1);
        assert_eq!(fit.assignments.len(), data.len());
    }

    #[test]
    fn invalid_k_is_rejected() {
        let data = three_pairs();
        assert!(matches!(
            Kmeans::new(1).partition(&data, &[1.0, 1.0], None),
            Err(Error::InvalidClusterCount { requested: 1, .. })
        ));
        assert!(matches!(
            Kmeans::new(6).partition(&data, &[1.0, 1.0], None),
            Err(Error::InvalidClusterCount { requested: 6, n_items: 6 })
        ));
        assert!(matches!(
            Kmeans::new(2).with_max_iter(0).partition(&data, &[1.0, 1.0], None),
            Err(Error::InvalidParameter { name: "max_iter", .. })
        ));
    }

    #[test]
    fn weights_change_the_partition() {
        // Two natural groupings: by x (columns) or by y (rows).
        let data = vec![
            vec![0.0, 0.0],
            vec![0.0, 3.0],
            vec![3.0, 0.0],
            vec![3.0, 3.0],
            vec![0.1, 0.1],
        ];
        let seeds = vec![vec![0.0, 0.0], vec![3.0, 3.0]];

        let by_x = Kmeans::new(2)
            .partition(&data, &[100.0, 0.01], Some(&seeds[..]))
            .unwrap();
        assert_eq!(by_x.assignments[0], by_x.assignments[1]);
        assert_ne!(by_x.assignments[0], by_x.assignments[2]);

        let by_y = Kmeans::new(2)
            .partition(&data, &[0.01, 100.0], Some(&seeds[..]))
            .unwrap();
        assert_eq!(by_y.assignments[0], by_y.assignments[2]);
        assert_ne!(by_y.assignments[0], by_y.assignments[1]);
    }
}
