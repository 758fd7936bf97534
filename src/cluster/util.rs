use crate::distance::weighted_squared_euclidean;
use crate::error::{check_dimensions, Error, Result};

/// Validate a partitioning request and return the dimensionality.
///
/// `k` must lie in `[2, n - 1]`: one cluster is not a partition, and `n` clusters
/// leave nothing to group.
pub(crate) fn validate_request(data: &[Vec<f32>], weights: &[f32], k: usize) -> Result<usize> {
    let d = check_dimensions(data)?;
    if weights.len() != d {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: weights.len(),
        });
    }
    let n = data.len();
    if k < 2 || k + 1 > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }
    Ok(d)
}

/// Seeds are only usable when they are exactly `k` vectors of dimension `d`.
pub(crate) fn usable_seeds(seeds: Option<&[Vec<f32>]>, k: usize, d: usize) -> Option<&[Vec<f32>]> {
    seeds.filter(|s| s.len() == k && s.iter().all(|c| c.len() == d))
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Index of the center nearest to `point` under the weighted metric.
///
/// Ties go to the first minimal index.
pub(crate) fn nearest_center(point: &[f32], centers: &[Vec<f32>], weights: &[f32]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let d = weighted_squared_euclidean(point, center, weights);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}

/// Per-dimension mean of the points assigned to each of `k` clusters.
///
/// Clusters that received no points keep `previous[j]`.
pub(crate) fn cluster_means(
    data: &[Vec<f32>],
    assignments: &[usize],
    previous: &[Vec<f32>],
) -> Vec<Vec<f32>> {
    let k = previous.len();
    let d = data.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0f64; d]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in data.iter().zip(assignments) {
        counts[label] += 1;
        for (s, &x) in sums[label].iter_mut().zip(point) {
            *s += f64::from(x);
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(j, (sum, count))| {
            if count == 0 {
                previous[j].clone()
            } else {
                sum.into_iter().map(|s| (s / count as f64) as f32).collect()
            }
        })
        .collect()
}
