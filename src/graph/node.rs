use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::NodeRecord;
use crate::geometry::Point;

/// Stable identifier of an ordinary node.
pub type NodeId = u64;

/// Cluster label, an index into the session's centers.
pub type ClusterId = usize;

/// Descriptive fields carried for display; never used by clustering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Author of the text.
    pub author: String,
    /// Publication timestamp as given in the input.
    pub published_at: String,
    /// The text itself.
    pub text: String,
}

/// An ordinary node: one input item.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Stable id.
    pub id: NodeId,
    /// Unweighted embedding.
    pub embedding: Vec<f32>,
    /// Current cluster.
    pub cluster: ClusterId,
    /// Normalized distance to every other ordinary node, rebuilt with the distance matrix.
    pub distances: HashMap<NodeId, f32>,
    /// Last position reported by the layout engine.
    pub position: Option<Point>,
    /// Position the node was dropped at; the layout keeps it fixed there.
    pub pinned: Option<Point>,
    /// Display fields.
    pub meta: NodeMeta,
}

impl Node {
    /// Node with no cluster assignment or position yet.
    pub fn new(id: NodeId, embedding: Vec<f32>) -> Self {
        Self {
            id,
            embedding,
            cluster: 0,
            distances: HashMap::new(),
            position: None,
            pinned: None,
            meta: NodeMeta::default(),
        }
    }

    /// Normalized distance to `other`, if known.
    pub fn distance_to(&self, other: NodeId) -> Option<f32> {
        if other == self.id {
            return Some(0.0);
        }
        self.distances.get(&other).copied()
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self {
            meta: NodeMeta {
                author: record.author,
                published_at: record.published_at,
                text: record.text,
            },
            ..Node::new(record.id, record.embedding)
        }
    }
}

/// Synthetic node standing for a cluster's center.
#[derive(Clone, Debug, PartialEq)]
pub struct CentroidNode {
    /// Cluster this node represents.
    pub cluster: ClusterId,
    /// Center vector (mean or medoid embedding).
    pub center: Vec<f32>,
    /// The ordinary node serving as medoid, for medoid-based strategies.
    pub medoid: Option<NodeId>,
    /// Last position reported by the layout engine.
    pub position: Option<Point>,
}

/// Reference to either kind of node. Centroids live in their own index space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRef {
    /// An ordinary node by id.
    Ordinary(NodeId),
    /// A centroid node by cluster.
    Centroid(ClusterId),
}

impl NodeRef {
    /// Whether this is a synthetic centroid node.
    pub fn is_centroid(&self) -> bool {
        matches!(self, NodeRef::Centroid(_))
    }
}
