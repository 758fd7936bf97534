//! Graph view of a clustering: ordinary and centroid nodes, links between them, and
//! the parameters the external force layout needs.
//!
//! Ordinary and centroid nodes are kept in separate collections and only meet here,
//! when links are built. Nodes refer to clusters by index, never by reference.

mod force;
mod links;
mod node;

pub use force::{ClusterCompactness, ClusterSeparation, ForceConfig, CHARGE_MAX_DISTANCE, WARM_UP_TICKS};
pub use links::{build_links, Link, LinkKind, LinkOptions, CENTROID_FAR_DISTANCE, CENTROID_MEMBER_DISTANCE};
pub use node::{CentroidNode, ClusterId, Node, NodeId, NodeMeta, NodeRef};
