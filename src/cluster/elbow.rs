//! Elbow-method selection of `k`.
//!
//! K-means is fitted for every `k` in a bounded range and the sum of squared errors
//! (SSE) recorded. Very small `k` are skipped: the chosen `k` must be at least
//! `floor(sqrt(n / 2))`. From there, the first `k` whose SSE is not improved upon by
//! `k + 1` is the elbow. Without an elbow the configured fallback is used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::kmeans::Kmeans;
use super::traits::{Partition, Partitioner};
use crate::error::{check_dimensions, Error, Result};

/// Bounds for the elbow search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbowConfig {
    /// Smallest `k` fitted.
    pub min_k: usize,
    /// Largest `k` fitted (clamped to `n - 1`).
    pub max_k: usize,
    /// `k` used when no elbow is found.
    pub fallback_k: usize,
}

impl Default for ElbowConfig {
    fn default() -> Self {
        Self {
            min_k: 2,
            max_k: 15,
            fallback_k: 8,
        }
    }
}

/// Outcome of the elbow search.
#[derive(Clone, Debug)]
pub struct ElbowChoice {
    /// Selected cluster count.
    pub k: usize,
    /// Whether `k` came from an elbow rather than the fallback.
    pub found_elbow: bool,
    /// SSE per fitted `k`.
    pub sse: BTreeMap<usize, f32>,
    /// The k-means fit for the selected `k`.
    pub partition: Partition,
}

/// Choose `k` for `data` under `weights` with the elbow method.
///
/// Each candidate is fitted with `kmeans` reconfigured to that `k`.
///
/// # Errors
///
/// - Input validation errors from the distance metric.
/// - [`Error::InvalidClusterCount`] if the dataset is too small for any `k >= min_k`.
/// - [`Error::InvalidParameter`] if `min_k < 2` or `max_k < min_k`.
pub fn select_k_by_elbow(
    data: &[Vec<f32>],
    weights: &[f32],
    config: &ElbowConfig,
    kmeans: impl Fn(usize) -> Kmeans,
) -> Result<ElbowChoice> {
    check_dimensions(data)?;
    if config.min_k < 2 {
        return Err(Error::InvalidParameter {
            name: "min_k",
            message: "must be at least 2",
        });
    }
    if config.max_k < config.min_k {
        return Err(Error::InvalidParameter {
            name: "max_k",
            message: "must be at least min_k",
        });
    }

    let n = data.len();
    let max_k = config.max_k.min(n.saturating_sub(1));
    if max_k < config.min_k {
        return Err(Error::InvalidClusterCount {
            requested: config.min_k,
            n_items: n,
        });
    }

    let mut fits: BTreeMap<usize, Partition> = BTreeMap::new();
    let mut sse: BTreeMap<usize, f32> = BTreeMap::new();
    for k in config.min_k..=max_k {
        let fit = kmeans(k).partition(data, weights, None)?;
        let error = fit.sse(data, weights);
        debug!(k, sse = error, "elbow candidate");
        sse.insert(k, error);
        fits.insert(k, fit);
    }

    let floor = ((n as f64 / 2.0).sqrt()).floor() as usize;
    let elbow = sse
        .iter()
        .filter(|&(&k, _)| k >= floor)
        .find(|&(&k, &e)| sse.get(&(k + 1)).is_some_and(|&next| e <= next))
        .map(|(&k, _)| k);

    let (k, found_elbow) = match elbow {
        Some(k) => (k, true),
        None => (config.fallback_k.clamp(config.min_k, max_k), false),
    };
    info!(k, found_elbow, "elbow selected cluster count");

    let partition = fits.remove(&k).ok_or(Error::InvalidClusterCount {
        requested: k,
        n_items: n,
    })?;

    Ok(ElbowChoice {
        k,
        found_elbow,
        sse,
        partition,
    })
}
