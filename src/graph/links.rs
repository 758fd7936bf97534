use serde::{Deserialize, Serialize};

use super::node::{CentroidNode, Node, NodeRef};

/// Normalized distance annotated on centroid-to-centroid and centroid-to-outsider links.
pub const CENTROID_FAR_DISTANCE: f32 = 1.0;

/// Normalized distance annotated on centroid-to-member links.
pub const CENTROID_MEMBER_DISTANCE: f32 = 0.0;

/// Structural class of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Between two ordinary nodes, in the same or different clusters.
    Pairwise,
    /// Between two centroid nodes.
    CentroidPair,
    /// From a centroid to a member of its cluster.
    CentroidMember,
    /// From a centroid to a node outside its cluster; drawn muted.
    CentroidExternal,
}

impl LinkKind {
    /// Default rendering weight (line width / opacity multiplier).
    pub fn default_weight(self) -> f32 {
        match self {
            LinkKind::Pairwise => 1.0,
            LinkKind::CentroidPair => 2.0,
            LinkKind::CentroidMember => 1.5,
            LinkKind::CentroidExternal => 0.2,
        }
    }
}

/// One undirected edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// First endpoint.
    pub source: NodeRef,
    /// Second endpoint.
    pub target: NodeRef,
    /// Structural class.
    pub kind: LinkKind,
    /// Normalized distance annotation in `[0, 1]`.
    pub distance: f32,
}

/// Which optional links to emit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Link each centroid to every node outside its cluster.
    pub include_external: bool,
}

/// Build the edge set for rendering and force configuration.
///
/// Every unordered pair of ordinary nodes gets exactly one [`LinkKind::Pairwise`] link
/// annotated with their normalized distance. Cluster membership is not used to omit
/// pairwise links; the layout reads it when choosing link lengths. Each centroid links
/// once to every other centroid and to each member of its cluster, and optionally to
/// every non-member.
pub fn build_links(nodes: &[Node], centroids: &[CentroidNode], options: &LinkOptions) -> Vec<Link> {
    let n = nodes.len();
    let c = centroids.len();
    let mut links = Vec::with_capacity(n * n.saturating_sub(1) / 2 + c * c.saturating_sub(1) / 2 + c * n);

    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            // Unknown pairs render as far apart.
            let distance = a.distance_to(b.id).unwrap_or(CENTROID_FAR_DISTANCE);
            links.push(Link {
                source: NodeRef::Ordinary(a.id),
                target: NodeRef::Ordinary(b.id),
                kind: LinkKind::Pairwise,
                distance,
            });
        }
    }

    for (i, a) in centroids.iter().enumerate() {
        for b in &centroids[i + 1..] {
            links.push(Link {
                source: NodeRef::Centroid(a.cluster),
                target: NodeRef::Centroid(b.cluster),
                kind: LinkKind::CentroidPair,
                distance: CENTROID_FAR_DISTANCE,
            });
        }
    }

    for centroid in centroids {
        for node in nodes {
            let member = node.cluster == centroid.cluster;
            if !member && !options.include_external {
                continue;
            }
            let (kind, distance) = if member {
                (LinkKind::CentroidMember, CENTROID_MEMBER_DISTANCE)
            } else {
                (LinkKind::CentroidExternal, CENTROID_FAR_DISTANCE)
            };
            links.push(Link {
                source: NodeRef::Centroid(centroid.cluster),
                target: NodeRef::Ordinary(node.id),
                kind,
                distance,
            });
        }
    }

    links
}
