//! Parameters handed to the external force layout.
//!
//! The layout engine owns the physics. This crate only tells it how long each link
//! should be and how far node repulsion reaches.

use serde::{Deserialize, Serialize};

use super::links::{Link, LinkKind};
use super::node::{ClusterId, NodeRef};

/// Repulsion cutoff distance, in layout units.
pub const CHARGE_MAX_DISTANCE: f64 = 200.0;

/// Layout ticks to run before the first frame is shown.
pub const WARM_UP_TICKS: u32 = 200;

/// How tightly members of one cluster are pulled together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterCompactness {
    /// Members nearly on top of each other.
    MoreCompact,
    /// Default spacing.
    #[default]
    Normal,
    /// Members spread out.
    LessCompact,
}

impl ClusterCompactness {
    /// Target length of a link inside one cluster.
    pub fn link_distance(self) -> f64 {
        match self {
            ClusterCompactness::MoreCompact => 10.0,
            ClusterCompactness::Normal => 80.0,
            ClusterCompactness::LessCompact => 180.0,
        }
    }
}

/// How far apart different clusters are pushed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterSeparation {
    /// Clusters closer together.
    Closer,
    /// Default spacing.
    #[default]
    Normal,
    /// Clusters further apart.
    Farther,
}

impl ClusterSeparation {
    /// Target length of a link between clusters.
    pub fn link_distance(self) -> f64 {
        match self {
            ClusterSeparation::Closer => 300.0,
            ClusterSeparation::Normal => 500.0,
            ClusterSeparation::Farther => 700.0,
        }
    }
}

/// Force-layout presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Intra-cluster spacing.
    pub compactness: ClusterCompactness,
    /// Inter-cluster spacing.
    pub separation: ClusterSeparation,
}

impl ForceConfig {
    /// Target length for `link`.
    ///
    /// `cluster_of` resolves an ordinary node's current cluster; unknown nodes are
    /// treated as belonging elsewhere.
    pub fn link_distance<F>(&self, link: &Link, cluster_of: F) -> f64
    where
        F: Fn(NodeRef) -> Option<ClusterId>,
    {
        let same = self.compactness.link_distance();
        let different = self.separation.link_distance();
        match link.kind {
            LinkKind::CentroidMember => same,
            LinkKind::CentroidPair | LinkKind::CentroidExternal => different,
            LinkKind::Pairwise => match (cluster_of(link.source), cluster_of(link.target)) {
                (Some(a), Some(b)) if a == b => same,
                _ => different,
            },
        }
    }

    /// Repulsion cutoff distance.
    pub fn charge_max_distance(&self) -> f64 {
        CHARGE_MAX_DISTANCE
    }
}
