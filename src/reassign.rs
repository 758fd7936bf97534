//! Drag-driven reassignment by weight adaptation.
//!
//! A drag that drops a node inside another cluster's region is taken as evidence that
//! the metric under-weights whatever the user cares about. Instead of overriding the
//! node's label (which the next recluster would undo), the controller nudges the
//! attribute weights and reclusters, repeating until the node lands in the destination
//! cluster or the iteration cap is reached.
//!
//! Cluster ids can shift across reclusters, so source and destination are tracked by
//! the center nearest to where each was on the previous iteration.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::cluster::util::squared_euclidean;
use crate::error::{Error, Result};
use crate::graph::{ClusterId, NodeId};
use crate::weights::AttributeWeights;

/// Tuning for the adaptation loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassignConfig {
    /// Upper bound on nudge-and-recluster rounds per drag.
    pub max_iterations: usize,
    /// Step size of the first round.
    pub learning_rate: f32,
    /// Step size decays as `learning_rate / (1 + decay * t)`.
    pub decay: f32,
    /// Floor for every attribute weight.
    pub min_weight: f32,
}

impl Default for ReassignConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            learning_rate: 0.5,
            decay: 0.05,
            min_weight: 1e-3,
        }
    }
}

impl ReassignConfig {
    /// Step size for round `t`, counting from zero.
    pub fn rate(&self, t: usize) -> f32 {
        self.learning_rate / (1.0 + self.decay * t as f32)
    }
}

/// Where the controller is in a drag gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    /// Waiting for a drag to end.
    #[default]
    Idle,
    /// Adapting weights so `node` moves from cluster `from` to `to`.
    Pending {
        /// Dragged node.
        node: NodeId,
        /// Cluster the node started in.
        from: ClusterId,
        /// Cluster whose region the node was dropped in.
        to: ClusterId,
    },
}

/// What the controller needs from the clustering it steers.
pub trait ReclusterTarget {
    /// Embedding of an ordinary node.
    fn embedding(&self, node: NodeId) -> Option<&[f32]>;

    /// Current cluster of an ordinary node.
    fn cluster_of(&self, node: NodeId) -> Option<ClusterId>;

    /// Center of a cluster, or `None` if it is unknown or has no members.
    fn center(&self, cluster: ClusterId) -> Option<&[f32]>;

    /// All current centers, indexed by cluster id.
    fn centers(&self) -> &[Vec<f32>];

    /// The weights to adapt.
    fn weights_mut(&mut self) -> &mut AttributeWeights;

    /// Rerun the pipeline under the current weights, seeded from the current centers.
    fn recluster(&mut self) -> Result<()>;
}

/// Summary of one completed adaptation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassignRun {
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
}

/// Drag-end state machine.
#[derive(Clone, Debug, Default)]
pub struct ReassignmentController {
    state: DragState,
    config: ReassignConfig,
}

impl ReassignmentController {
    /// Idle controller.
    pub fn new(config: ReassignConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a new drag can be handled.
    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Loop tuning.
    pub fn config(&self) -> &ReassignConfig {
        &self.config
    }

    /// Adapt `target` so `node` moves into cluster `to`.
    ///
    /// Returns `Ok(None)` when nothing changed: the node is already in `to`, either
    /// center cannot be resolved, or the first nudge leaves the weights as they were.
    /// The controller is idle again when this
    /// returns, whether or not it succeeded.
    ///
    /// # Errors
    ///
    /// - [`Error::ReassignmentInProgress`] if the controller is not idle.
    /// - [`Error::UnknownNode`] if `node` is not in `target`.
    /// - Any error from [`ReclusterTarget::recluster`].
    pub fn run<T>(&mut self, target: &mut T, node: NodeId, to: ClusterId) -> Result<Option<ReassignRun>>
    where
        T: ReclusterTarget + ?Sized,
    {
        if !self.is_idle() {
            return Err(Error::ReassignmentInProgress);
        }
        let from = target.cluster_of(node).ok_or(Error::UnknownNode(node))?;
        if from == to {
            return Ok(None);
        }

        self.state = DragState::Pending { node, from, to };
        let outcome = self.adapt(target, node, from, to);
        self.state = DragState::Idle;
        outcome
    }

    fn adapt<T>(&self, target: &mut T, node: NodeId, from: ClusterId, to: ClusterId) -> Result<Option<ReassignRun>>
    where
        T: ReclusterTarget + ?Sized,
    {
        let embedding = target.embedding(node).ok_or(Error::UnknownNode(node))?.to_vec();
        let (mut source_anchor, mut dest_anchor) = match (target.center(from), target.center(to)) {
            (Some(s), Some(d)) => (s.to_vec(), d.to_vec()),
            _ => {
                debug!(node, from, to, "reassignment aborted: center unresolved");
                return Ok(None);
            }
        };
        info!(node, from, to, "reassignment started");

        let mut dest = to;
        let mut iterations = 0;
        let mut landed = false;

        while iterations < self.config.max_iterations {
            let rate = self.config.rate(iterations);
            if !target.weights_mut().nudge(&embedding, &source_anchor, &dest_anchor, rate) {
                debug!(node, iterations, "reassignment stalled: weights unchanged");
                break;
            }
            iterations += 1;
            target.recluster()?;

            let source = nearest_anchor(target.centers(), &source_anchor);
            dest = nearest_anchor(target.centers(), &dest_anchor);
            let current = target.cluster_of(node);
            trace!(node, iterations, rate, ?current, dest, "reassignment round");

            if current == Some(dest) {
                landed = true;
                break;
            }
            match (target.center(source), target.center(dest)) {
                (Some(s), Some(d)) if source != dest => {
                    source_anchor = s.to_vec();
                    dest_anchor = d.to_vec();
                }
                _ => {
                    debug!(node, iterations, "reassignment stopped: center unresolved");
                    break;
                }
            }
        }

        if iterations == 0 {
            debug!(node, from, to, "reassignment left weights unchanged");
            return Ok(None);
        }
        info!(node, from, to = dest, iterations, landed, "reassignment finished");
        Ok(Some(ReassignRun {
            node,
            from,
            to: dest,
            iterations,
            landed,
        }))
    }
}

/// Index of the center closest to `anchor` in plain Euclidean terms; ties go low.
fn nearest_anchor(centers: &[Vec<f32>], anchor: &[f32]) -> ClusterId {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        if center.len() != anchor.len() {
            continue;
        }
        let d = squared_euclidean(center, anchor);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}
