//! K-medoids over a precomputed distance matrix.
//!
//! Unlike k-means, each cluster is represented by one of the input points (its medoid),
//! so the algorithm only ever needs pairwise distances.
//!
//! ## Algorithm
//!
//! 1. **BUILD** (Kaufman & Rousseeuw): pick the point with the smallest total distance,
//!    then greedily add the point that most reduces the total distance to the nearest
//!    medoid, until `k` medoids are chosen. Deterministic.
//! 2. **Refine**: alternate between assigning points to their nearest medoid and moving
//!    each medoid to the member with the smallest total in-cluster distance, until no
//!    medoid changes or the cap is reached.
//!
//! Clusters are finally relabeled by ascending size, ties by medoid index, so label
//! order does not depend on which medoid happened to be found first.

use std::cmp::Ordering;

use tracing::debug;

use super::traits::{Partition, Partitioner};
use super::util::{usable_seeds, validate_request};
use crate::distance::{compute_distance_matrix, weighted_squared_euclidean, DistanceMatrix};
use crate::error::{Error, Result};

/// Output of [`KMedoids::fit_matrix`].
#[derive(Clone, Debug, PartialEq)]
pub struct MedoidFit {
    /// Cluster label per point.
    pub assignments: Vec<usize>,
    /// Point index of each cluster's medoid, indexed by label.
    pub medoids: Vec<usize>,
    /// Distance from each point to its medoid.
    pub distance_from_medoid: Vec<f32>,
    /// Refinement iterations run.
    pub iterations: usize,
    /// Whether refinement stopped because no medoid moved.
    pub converged: bool,
}

/// K-medoids partitioner.
#[derive(Clone, Debug)]
pub struct KMedoids {
    k: usize,
    max_iter: usize,
}

impl KMedoids {
    /// Default refinement cap.
    pub const DEFAULT_MAX_ITER: usize = 300;

    /// Create a k-medoids partitioner for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: Self::DEFAULT_MAX_ITER,
        }
    }

    /// Set the refinement cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Cluster directly from a distance matrix.
    ///
    /// `initial` medoids are used when they are `k` distinct in-range indices;
    /// otherwise BUILD chooses them.
    pub fn fit_matrix(&self, matrix: &DistanceMatrix, initial: Option<&[usize]>) -> Result<MedoidFit> {
        let n = matrix.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k < 2 || self.k + 1 > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut medoids = match initial.filter(|m| valid_medoids(m, self.k, n)) {
            Some(m) => m.to_vec(),
            None => build(matrix, self.k),
        };

        let mut assignments = assign(matrix, &medoids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let mut moved = false;
            for (label, medoid) in medoids.iter_mut().enumerate() {
                let members: Vec<usize> = (0..n).filter(|&i| assignments[i] == label).collect();
                let best = best_medoid(matrix, &members, *medoid);
                if best != *medoid {
                    *medoid = best;
                    moved = true;
                }
            }

            assignments = assign(matrix, &medoids);
            if !moved {
                converged = true;
                break;
            }
        }

        let (assignments, medoids) = order_by_size(&assignments, &medoids);
        let distance_from_medoid = assignments
            .iter()
            .enumerate()
            .map(|(i, &label)| matrix.get(i, medoids[label]))
            .collect();

        debug!(k = self.k, iterations, converged, "k-medoids finished");

        Ok(MedoidFit {
            assignments,
            medoids,
            distance_from_medoid,
            iterations,
            converged,
        })
    }
}

impl Default for KMedoids {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Partitioner for KMedoids {
    fn partition(
        &self,
        data: &[Vec<f32>],
        weights: &[f32],
        seeds: Option<&[Vec<f32>]>,
    ) -> Result<Partition> {
        let d = validate_request(data, weights, self.k)?;
        let matrix = compute_distance_matrix(data, weights)?;

        let initial = usable_seeds(seeds, self.k, d).map(|s| snap_to_points(data, s, weights));
        let fit = self.fit_matrix(&matrix, initial.as_deref())?;

        let centers = fit.medoids.iter().map(|&m| data[m].clone()).collect();
        Ok(Partition {
            assignments: fit.assignments,
            centers,
            medoids: Some(fit.medoids),
            iterations: fit.iterations,
            converged: fit.converged,
        })
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn valid_medoids(medoids: &[usize], k: usize, n: usize) -> bool {
    if medoids.len() != k || medoids.iter().any(|&m| m >= n) {
        return false;
    }
    let mut sorted = medoids.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|w| w[0] != w[1])
}

/// Map seed vectors to distinct nearest data points under `weights`, in seed order.
fn snap_to_points(data: &[Vec<f32>], seeds: &[Vec<f32>], weights: &[f32]) -> Vec<usize> {
    let mut taken = vec![false; data.len()];
    seeds
        .iter()
        .filter_map(|seed| {
            let idx = data
                .iter()
                .enumerate()
                .filter(|(i, _)| !taken[*i])
                .min_by(|(_, a), (_, b)| {
                    weighted_squared_euclidean(a, seed, weights)
                        .partial_cmp(&weighted_squared_euclidean(b, seed, weights))
                        .unwrap_or(Ordering::Equal)
                })
                .map(|(i, _)| i)?;
            taken[idx] = true;
            Some(idx)
        })
        .collect()
}

fn build(matrix: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = matrix.len();

    let first = (0..n)
        .min_by(|&a, &b| {
            let sa: f32 = matrix.row(a).iter().sum();
            let sb: f32 = matrix.row(b).iter().sum();
            sa.partial_cmp(&sb).unwrap_or(Ordering::Equal)
        })
        .unwrap_or(0);

    let mut medoids = vec![first];
    let mut nearest: Vec<f32> = matrix.row(first).to_vec();

    while medoids.len() < k {
        let mut best = usize::MAX;
        let mut best_gain = f32::NEG_INFINITY;
        for candidate in 0..n {
            if medoids.contains(&candidate) {
                continue;
            }
            let gain: f32 = (0..n)
                .map(|j| (nearest[j] - matrix.get(candidate, j)).max(0.0))
                .sum();
            if gain > best_gain {
                best_gain = gain;
                best = candidate;
            }
        }
        if best == usize::MAX {
            break;
        }
        medoids.push(best);
        for (j, d) in nearest.iter_mut().enumerate() {
            *d = d.min(matrix.get(best, j));
        }
    }
    medoids
}

/// Nearest-medoid labels. A medoid always labels itself, even when another medoid sits
/// at the same (normalized) distance.
fn assign(matrix: &DistanceMatrix, medoids: &[usize]) -> Vec<usize> {
    (0..matrix.len())
        .map(|i| {
            if let Some(own) = medoids.iter().position(|&m| m == i) {
                return own;
            }
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (label, &m) in medoids.iter().enumerate() {
                let d = matrix.get(i, m);
                if d < best_dist {
                    best_dist = d;
                    best = label;
                }
            }
            best
        })
        .collect()
}

/// Member with the smallest total distance to the other members; `current` wins ties.
fn best_medoid(matrix: &DistanceMatrix, members: &[usize], current: usize) -> usize {
    let cost = |c: usize| -> f32 { members.iter().map(|&j| matrix.get(c, j)).sum() };
    let mut best = current;
    let mut best_cost = cost(current);
    for &candidate in members {
        let c = cost(candidate);
        if c < best_cost {
            best_cost = c;
            best = candidate;
        }
    }
    best
}

fn order_by_size(assignments: &[usize], medoids: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut sizes = vec![0usize; medoids.len()];
    for &label in assignments {
        sizes[label] += 1;
    }

    let mut order: Vec<usize> = (0..medoids.len()).collect();
    order.sort_by_key(|&label| (sizes[label], medoids[label]));

    let mut relabel = vec![0usize; medoids.len()];
    for (new, &old) in order.iter().enumerate() {
        relabel[old] = new;
    }

    let assignments = assignments.iter().map(|&l| relabel[l]).collect();
    let medoids = order.iter().map(|&old| medoids[old]).collect();
    (assignments, medoids)
}
