//! Session configuration.
//!
//! Everything is optional in JSON; missing fields take their defaults.
//!
//! ```rust
//! use corral::{SessionConfig, StrategyKind};
//!
//! let config = SessionConfig::from_json_str(r#"{ "strategy": "kmedoids", "k": 4 }"#).unwrap();
//! assert_eq!(config.strategy, StrategyKind::Kmedoids);
//! assert_eq!(config.reassign.max_iterations, 100);
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::cluster::{ElbowConfig, KMedoids, Kmeans, Strategy, StrategyKind};
use crate::error::{Error, Result};
use crate::geometry::DEFAULT_ARC_RADIUS;
use crate::graph::{ForceConfig, LinkOptions};
use crate::reassign::ReassignConfig;

/// K-means settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmeansConfig {
    /// Lloyd iteration cap.
    pub max_iter: usize,
    /// Random initializations per unseeded fit.
    pub restarts: usize,
}

impl Default for KmeansConfig {
    fn default() -> Self {
        Self {
            max_iter: Kmeans::DEFAULT_MAX_ITER,
            restarts: 1,
        }
    }
}

/// K-medoids settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmedoidsConfig {
    /// Refinement cap.
    pub max_iter: usize,
}

impl Default for KmedoidsConfig {
    fn default() -> Self {
        Self {
            max_iter: KMedoids::DEFAULT_MAX_ITER,
        }
    }
}

/// Hull cache settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Radius of the circle drawn around clusters with too few points for a hull.
    pub arc_radius: f64,
    /// Render frames between forced hull rebuilds.
    pub refresh_frames: u32,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            arc_radius: DEFAULT_ARC_RADIUS,
            refresh_frames: 30,
        }
    }
}

/// All settings for a [`Session`](crate::Session).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Partitioning algorithm, fixed for the session.
    pub strategy: StrategyKind,
    /// Explicit cluster count; `None` selects one with the elbow method.
    pub k: Option<usize>,
    /// RNG seed for reproducible initialization.
    pub seed: Option<u64>,
    /// K-means settings.
    pub kmeans: KmeansConfig,
    /// K-medoids settings.
    pub kmedoids: KmedoidsConfig,
    /// Elbow search bounds.
    pub elbow: ElbowConfig,
    /// Hull cache settings.
    pub hull: HullConfig,
    /// Reassignment loop tuning.
    pub reassign: ReassignConfig,
    /// Optional links.
    pub links: LinkOptions,
    /// Force-layout presets.
    pub force: ForceConfig,
}

impl SessionConfig {
    /// Parse and validate JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, message: &'static str) -> Result<()> {
            Err(Error::InvalidParameter { name, message })
        }

        if matches!(self.k, Some(k) if k < 2) {
            return invalid("k", "must be at least 2");
        }
        if self.kmeans.max_iter == 0 {
            return invalid("kmeans.max_iter", "must be at least 1");
        }
        if self.kmeans.restarts == 0 {
            return invalid("kmeans.restarts", "must be at least 1");
        }
        if self.kmedoids.max_iter == 0 {
            return invalid("kmedoids.max_iter", "must be at least 1");
        }
        if self.elbow.min_k < 2 {
            return invalid("elbow.min_k", "must be at least 2");
        }
        if self.elbow.max_k < self.elbow.min_k {
            return invalid("elbow.max_k", "must be at least elbow.min_k");
        }
        if !(self.hull.arc_radius > 0.0 && self.hull.arc_radius.is_finite()) {
            return invalid("hull.arc_radius", "must be positive and finite");
        }
        if self.hull.refresh_frames == 0 {
            return invalid("hull.refresh_frames", "must be at least 1");
        }
        let r = &self.reassign;
        if r.max_iterations == 0 {
            return invalid("reassign.max_iterations", "must be at least 1");
        }
        if !(r.learning_rate > 0.0 && r.learning_rate.is_finite()) {
            return invalid("reassign.learning_rate", "must be positive and finite");
        }
        if !(r.decay >= 0.0 && r.decay.is_finite()) {
            return invalid("reassign.decay", "must be non-negative and finite");
        }
        if !(r.min_weight > 0.0 && r.min_weight < 1.0) {
            return invalid("reassign.min_weight", "must lie in (0, 1)");
        }
        Ok(())
    }

    /// K-means for `k` clusters with these settings.
    pub fn kmeans(&self, k: usize) -> Kmeans {
        let m = Kmeans::new(k)
            .with_max_iter(self.kmeans.max_iter)
            .with_restarts(self.kmeans.restarts);
        match self.seed {
            Some(seed) => m.with_seed(seed),
            None => m,
        }
    }

    /// The configured strategy for `k` clusters.
    pub fn strategy(&self, k: usize) -> Strategy {
        match self.strategy {
            StrategyKind::Kmeans => Strategy::Kmeans(self.kmeans(k)),
            StrategyKind::Kmedoids => {
                Strategy::KMedoids(KMedoids::new(k).with_max_iter(self.kmedoids.max_iter))
            }
        }
    }
}
