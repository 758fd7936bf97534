//! The session: one clustered graph and the interaction state around it.
//!
//! All long-lived state (weights, assignments, hull cache, drag state) lives here and
//! is passed explicitly; there are no globals. Everything runs on the caller's thread.
//!
//! ```rust
//! use corral::{Node, Point, Session, SessionConfig};
//!
//! let nodes = vec![
//!     Node::new(1, vec![0.0, 0.0]),
//!     Node::new(2, vec![0.1, 0.0]),
//!     Node::new(3, vec![5.0, 5.0]),
//!     Node::new(4, vec![5.1, 5.0]),
//! ];
//! let config = SessionConfig { k: Some(2), seed: Some(1), ..SessionConfig::default() };
//! let mut session = Session::new(nodes, config).unwrap();
//!
//! // The layout engine reports positions; regions follow.
//! for (id, x) in [(1, 0.0), (2, 10.0), (3, 300.0), (4, 310.0)] {
//!     session.update_position(corral::NodeRef::Ordinary(id), Point::new(x, 0.0)).unwrap();
//! }
//! assert_eq!(session.on_render_frame().len(), 2);
//!
//! // Dropping a node in empty space changes nothing.
//! let outcome = session.on_node_drag_end(1, Point::new(150.0, 150.0)).unwrap();
//! assert!(!outcome.changed());
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::cluster::{select_k_by_elbow, StrategyKind};
use crate::config::SessionConfig;
use crate::data::{records_from_json_str, NodeRecord};
use crate::distance::DistanceMatrix;
use crate::error::{check_dimensions, Error, Result};
use crate::geometry::{compute_hulls, HullCache, Point, Region};
use crate::graph::{CentroidNode, ClusterId, ForceConfig, Link, Node, NodeId, NodeRef};
use crate::model::GraphModel;
use crate::reassign::{DragState, ReassignmentController};
use crate::weights::AttributeWeights;

/// Result of a drag that adapted the weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Reassignment {
    /// Dragged node.
    pub node: NodeId,
    /// Cluster the node started in.
    pub from: ClusterId,
    /// Destination cluster id in the final clustering.
    pub to: ClusterId,
    /// Nudge-and-recluster rounds performed.
    pub iterations: usize,
    /// Whether the node ended up in the destination cluster.
    pub landed: bool,
    /// Weights after adaptation.
    pub weights: Vec<f32>,
    /// Cluster of every ordinary node after adaptation.
    pub assignment: BTreeMap<NodeId, ClusterId>,
}

/// What a drag-end did.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Not dropped in another cluster's region, or nothing could be adapted.
    Unchanged,
    /// Weights were adapted and the graph reclustered.
    Reassigned(Reassignment),
}

impl DragOutcome {
    /// Whether weights and clustering were updated.
    pub fn changed(&self) -> bool {
        matches!(self, DragOutcome::Reassigned(_))
    }
}

/// A clustered graph with hull cache and drag handling.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    model: GraphModel,
    hulls: HullCache,
    controller: ReassignmentController,
}

impl Session {
    /// Cluster `nodes` and set up interaction state.
    ///
    /// Without an explicit `k`, the elbow method picks one. A k-means session then
    /// keeps the partition the elbow scored for that `k`.
    pub fn new(nodes: Vec<Node>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let embeddings: Vec<Vec<f32>> = nodes.iter().map(|n| n.embedding.clone()).collect();
        let d = check_dimensions(&embeddings)?;
        let weights = AttributeWeights::uniform(d, config.reassign.min_weight);

        let (k, scored) = match config.k {
            Some(k) => (k, None),
            None => {
                let choice =
                    select_k_by_elbow(&embeddings, weights.as_slice(), &config.elbow, |k| config.kmeans(k))?;
                // The elbow fits are k-means; k-medoids still fits its own partition.
                let scored = (config.strategy == StrategyKind::Kmeans).then_some(choice.partition);
                (choice.k, scored)
            }
        };

        let (strategy, links) = (config.strategy(k), config.links.clone());
        let model = match scored {
            Some(partition) => GraphModel::with_partition(nodes, weights, strategy, partition, links)?,
            None => GraphModel::new(nodes, weights, strategy, links)?,
        };
        info!(
            nodes = model.nodes().len(),
            dims = d,
            k,
            strategy = ?config.strategy,
            "session ready"
        );

        Ok(Self {
            hulls: HullCache::new(config.hull.arc_radius, config.hull.refresh_frames),
            controller: ReassignmentController::new(config.reassign.clone()),
            model,
            config,
        })
    }

    /// Build nodes from loaded records.
    pub fn from_records(records: Vec<NodeRecord>, config: SessionConfig) -> Result<Self> {
        Self::new(records.into_iter().map(Node::from).collect(), config)
    }

    /// Parse records from JSON and build a session.
    pub fn from_json_str(json: &str, config: SessionConfig) -> Result<Self> {
        Self::from_records(records_from_json_str(json)?, config)
    }

    /// Recluster from scratch with `k` clusters. Weights are kept.
    pub fn set_k(&mut self, k: usize) -> Result<()> {
        self.model.recompute_with(self.config.strategy(k), false)?;
        self.hulls.invalidate();
        info!(k, "cluster count changed");
        Ok(())
    }

    /// Rerun the pipeline under the current weights, keeping labels where possible.
    pub fn recompute(&mut self) -> Result<()> {
        self.model.recompute(true)?;
        self.hulls.invalidate();
        Ok(())
    }

    /// Record a position reported by the layout engine.
    pub fn update_position(&mut self, node: NodeRef, position: Point) -> Result<()> {
        match node {
            NodeRef::Ordinary(id) => {
                self.model.node_mut(id).ok_or(Error::UnknownNode(id))?.position = Some(position);
            }
            NodeRef::Centroid(c) => {
                self.model.centroid_mut(c).ok_or(Error::UnknownCluster(c))?.position = Some(position);
            }
        }
        Ok(())
    }

    /// Pin an ordinary node at a position, or release it with `None`.
    pub fn set_pinned(&mut self, id: NodeId, pinned: Option<Point>) -> Result<()> {
        self.model.node_mut(id).ok_or(Error::UnknownNode(id))?.pinned = pinned;
        Ok(())
    }

    /// Per-frame hook: regions, rebuilt only when stale or due.
    pub fn on_render_frame(&mut self) -> &BTreeMap<ClusterId, Region> {
        let model = &self.model;
        self.hulls.frame(|| model.hull_members())
    }

    /// Cached regions as of the last rebuild.
    pub fn regions(&self) -> &BTreeMap<ClusterId, Region> {
        self.hulls.regions()
    }

    /// Fresh regions from current positions, bypassing the cache.
    pub fn compute_hulls(&self) -> BTreeMap<ClusterId, Region> {
        compute_hulls(self.model.hull_members(), self.config.hull.arc_radius)
    }

    /// Handle the end of a drag at `position`.
    ///
    /// The node is pinned where it was dropped until [`Session::set_pinned`] releases
    /// it. If the position lies in another cluster's region, weights are adapted until
    /// the node joins that cluster or the iteration cap is reached.
    ///
    /// # Errors
    ///
    /// - [`Error::ReassignmentInProgress`] if a previous reassignment has not finished.
    /// - [`Error::UnknownNode`] if `id` is not an ordinary node.
    /// - Any error raised while reclustering.
    pub fn on_node_drag_end(&mut self, id: NodeId, position: Point) -> Result<DragOutcome> {
        if !self.controller.is_idle() {
            return Err(Error::ReassignmentInProgress);
        }
        let node = self.model.node_mut(id).ok_or(Error::UnknownNode(id))?;
        node.position = Some(position);
        node.pinned = Some(position);
        let from = node.cluster;

        let model = &self.model;
        self.hulls.refresh_if_stale(|| model.hull_members());
        let Some(to) = self.hulls.foreign_region_containing(position, from) else {
            debug!(node = id, cluster = from, "drag ended outside other regions");
            return Ok(DragOutcome::Unchanged);
        };

        let Some(run) = self.controller.run(&mut self.model, id, to)? else {
            return Ok(DragOutcome::Unchanged);
        };
        self.hulls.invalidate();

        Ok(DragOutcome::Reassigned(Reassignment {
            node: run.node,
            from: run.from,
            to: run.to,
            iterations: run.iterations,
            landed: run.landed,
            weights: self.model.weights().as_slice().to_vec(),
            assignment: self.model.assignment(),
        }))
    }

    /// Target length of `link` for the force layout.
    pub fn link_distance(&self, link: &Link) -> f64 {
        self.config.force.link_distance(link, |r| self.model.cluster_of_ref(r))
    }

    /// Settings this session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Force-layout presets.
    pub fn force(&self) -> &ForceConfig {
        &self.config.force
    }

    /// Change force-layout presets. Clustering is unaffected.
    pub fn set_force(&mut self, force: ForceConfig) {
        self.config.force = force;
    }

    /// Underlying graph model.
    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Ordinary nodes.
    pub fn nodes(&self) -> &[Node] {
        self.model.nodes()
    }

    /// Ordinary node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.model.node(id)
    }

    /// Centroid nodes.
    pub fn centroids(&self) -> &[CentroidNode] {
        self.model.centroids()
    }

    /// Current edge set.
    pub fn links(&self) -> &[Link] {
        self.model.links()
    }

    /// Current weights.
    pub fn weights(&self) -> &[f32] {
        self.model.weights().as_slice()
    }

    /// Current distance matrix.
    pub fn distance_matrix(&self) -> &DistanceMatrix {
        self.model.matrix()
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.model.k()
    }

    /// Drag state.
    pub fn drag_state(&self) -> DragState {
        self.controller.state()
    }
}
