//! Clustering and spatial reassignment for interactive graph views.
//!
//! `corral` groups embedded items into clusters, draws a region around each cluster's
//! on-screen points, and reacts when a user drags an item into another cluster's
//! region by adapting per-dimension attribute weights until the clustering agrees.
//!
//! The pieces, bottom-up:
//! - [`distance`]: weighted Euclidean distance matrix, normalized to `[0, 1]`
//! - [`geometry`]: convex hulls, circular fallbacks, containment tests, hull cache
//! - [`cluster`]: k-means, k-medoids, elbow selection of `k`
//! - [`graph`]: ordinary and centroid nodes, links, force-layout presets
//! - [`reassign`]: the drag-driven weight adaptation loop
//! - [`Session`]: ties it together behind the calls a UI layer makes
//!
//! Rendering and the force simulation itself live outside this crate.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod data;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod reassign;
pub mod session;
pub mod weights;

pub use cluster::{select_k_by_elbow, ElbowConfig, KMedoids, Kmeans, Partition, Partitioner, Strategy, StrategyKind};
pub use config::SessionConfig;
pub use data::NodeRecord;
pub use distance::{compute_distance_matrix, DistanceMatrix, DistanceRange};
pub use error::{Error, Result};
pub use geometry::{compute_hulls, point_in_region, HullCache, Point, Region};
pub use graph::{build_links, CentroidNode, ClusterId, Link, LinkKind, LinkOptions, Node, NodeId, NodeRef};
pub use session::{DragOutcome, Reassignment, Session};
pub use weights::AttributeWeights;
