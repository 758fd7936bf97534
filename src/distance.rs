//! Weighted pairwise distances.
//!
//! Every distance in this crate goes through the attribute-weighted Euclidean metric
//!
//! ```text
//! d(a, b) = sqrt( Σ_d w[d] · (a[d] - b[d])² )
//! ```
//!
//! The weight vector is what drag-driven reassignment adapts, so a change of weights
//! changes both the pairwise matrix used for link annotations and the metric the
//! partitioner clusters with.
//!
//! The matrix is min-max normalized over its off-diagonal entries. The raw range is
//! kept so callers can map normalized values back (e.g. for coloring).

use crate::error::{check_dimensions, Error, Result};

/// Weighted squared Euclidean distance.
#[inline]
pub fn weighted_squared_euclidean(a: &[f32], b: &[f32], weights: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), weights.len());
    a.iter()
        .zip(b.iter())
        .zip(weights.iter())
        .map(|((x, y), w)| {
            let d = x - y;
            w * d * d
        })
        .sum()
}

/// Weighted Euclidean distance.
#[inline]
pub fn weighted_euclidean(a: &[f32], b: &[f32], weights: &[f32]) -> f32 {
    weighted_squared_euclidean(a, b, weights).sqrt()
}

/// Minimum and maximum raw (pre-normalization) off-diagonal distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceRange {
    /// Smallest off-diagonal distance.
    pub min: f32,
    /// Largest off-diagonal distance.
    pub max: f32,
}

impl DistanceRange {
    /// `max - min`, or `None` when the range is empty and values were left unnormalized.
    pub fn span(&self) -> Option<f32> {
        let span = self.max - self.min;
        (span > 0.0 && span.is_finite()).then_some(span)
    }
}

/// Symmetric N×N matrix of normalized distances with a zero diagonal.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f32>,
    raw: DistanceRange,
}

impl DistanceMatrix {
    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Normalized distance between items `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.n + j]
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Raw off-diagonal range before normalization.
    pub fn raw_range(&self) -> DistanceRange {
        self.raw
    }
}

/// Compute the normalized pairwise distance matrix of `embeddings` under `weights`.
///
/// The upper triangle is computed and mirrored, so the result is symmetric by
/// construction. Off-diagonal entries are rescaled to `[0, 1]` with the matrix's own
/// off-diagonal min and max; when those coincide the values are left unchanged.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `embeddings` is empty.
/// - [`Error::DimensionMismatch`] if embeddings are ragged or `weights` has the wrong length.
pub fn compute_distance_matrix(embeddings: &[Vec<f32>], weights: &[f32]) -> Result<DistanceMatrix> {
    let d = check_dimensions(embeddings)?;
    if weights.len() != d {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: weights.len(),
        });
    }

    let n = embeddings.len();
    let mut values = vec![0.0f32; n * n];
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for i in 0..n {
        for j in (i + 1)..n {
            let mut v = weighted_euclidean(&embeddings[i], &embeddings[j], weights);
            if !v.is_finite() {
                v = 0.0;
            }
            values[i * n + j] = v;
            values[j * n + i] = v;
            min = min.min(v);
            max = max.max(v);
        }
    }

    // A single item has no off-diagonal entries.
    let raw = if n < 2 {
        DistanceRange::default()
    } else {
        DistanceRange { min, max }
    };

    if let Some(span) = raw.span() {
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let v = &mut values[i * n + j];
                    *v = ((*v - raw.min) / span).clamp(0.0, 1.0);
                }
            }
        }
    }

    Ok(DistanceMatrix { n, values, raw })
}
