//! Per-dimension attribute weights.
//!
//! The weight vector is the only long-lived mutable state that shapes clustering: the
//! distance matrix and both partitioners read it, and only reassignment writes it.
//! Every weight stays at or above a positive floor so no dimension ever drops out of
//! the metric entirely.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attribute weight vector with a positive floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeWeights {
    values: Vec<f32>,
    min_weight: f32,
}

impl AttributeWeights {
    /// `dims` weights of `1.0`.
    pub fn uniform(dims: usize, min_weight: f32) -> Self {
        Self {
            values: vec![1.0; dims],
            min_weight,
        }
    }

    /// Wrap existing weights.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `min_weight` is not positive or any value is
    /// below it or not finite.
    pub fn from_values(values: Vec<f32>, min_weight: f32) -> Result<Self> {
        if !(min_weight > 0.0 && min_weight.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "min_weight",
                message: "must be positive and finite",
            });
        }
        if values.iter().any(|&w| !w.is_finite() || w < min_weight) {
            return Err(Error::InvalidParameter {
                name: "weights",
                message: "must be finite and at least min_weight",
            });
        }
        Ok(Self { values, min_weight })
    }

    /// Weights as a slice, one per embedding dimension.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no dimensions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Floor applied after every update.
    pub fn min_weight(&self) -> f32 {
        self.min_weight
    }

    /// Shift weight toward the dimensions that separate `point` from `source` more than
    /// from `destination`, lowering the ratio of its destination to source distance.
    ///
    /// For each dimension `d`, `p_d` is that dimension's share of the weighted squared
    /// distance from `point` to `destination`, and `q_d` its share of the distance to
    /// `source`. Each weight is scaled by `1 + rate * (q_d - p_d)`, then the vector is
    /// rescaled to mean 1 and floored at [`min_weight`](Self::min_weight).
    ///
    /// Returns whether any weight changed.
    pub fn nudge(&mut self, point: &[f32], source: &[f32], destination: &[f32], rate: f32) -> bool {
        let d = self.values.len();
        if d == 0 || point.len() != d || source.len() != d || destination.len() != d {
            return false;
        }

        let to_dest = self.shares(point, destination);
        let to_source = self.shares(point, source);

        let before = self.values.clone();
        for ((w, p), q) in self.values.iter_mut().zip(&to_dest).zip(&to_source) {
            let factor = (1.0 + rate * (q - p)).max(0.0);
            *w *= factor;
        }

        let mean = self.values.iter().sum::<f32>() / d as f32;
        if mean > 0.0 && mean.is_finite() {
            for w in &mut self.values {
                *w /= mean;
            }
        }
        for w in &mut self.values {
            if !w.is_finite() || *w < self.min_weight {
                *w = self.min_weight;
            }
        }

        self.values != before
    }

    /// Per-dimension share of the weighted squared distance between `a` and `b`.
    ///
    /// Coincident points have no preferred dimension and get a uniform share.
    fn shares(&self, a: &[f32], b: &[f32]) -> Vec<f32> {
        let terms: Vec<f32> = self
            .values
            .iter()
            .zip(a.iter().zip(b))
            .map(|(&w, (&x, &y))| {
                let diff = x - y;
                w * diff * diff
            })
            .collect();
        let total: f32 = terms.iter().sum();
        if total > 0.0 && total.is_finite() {
            terms.into_iter().map(|t| t / total).collect()
        } else {
            vec![1.0 / self.values.len() as f32; self.values.len()]
        }
    }
}
