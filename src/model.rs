//! Clustered graph state and the recompute pipeline.
//!
//! One pass runs distance matrix, per-node distances, partition, centroid nodes and
//! links, in that order. A pass either fully succeeds or leaves the model untouched.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::cluster::{Partition, Partitioner, Strategy};
use crate::distance::{compute_distance_matrix, DistanceMatrix};
use crate::error::{check_dimensions, Error, Result};
use crate::geometry::Point;
use crate::graph::{build_links, CentroidNode, ClusterId, Link, LinkOptions, Node, NodeId, NodeRef};
use crate::reassign::ReclusterTarget;
use crate::weights::AttributeWeights;

/// Ordinary nodes, centroid nodes and everything derived from them.
#[derive(Clone, Debug)]
pub struct GraphModel {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    embeddings: Vec<Vec<f32>>,
    centroids: Vec<CentroidNode>,
    weights: AttributeWeights,
    matrix: DistanceMatrix,
    partition: Partition,
    strategy: Strategy,
    links: Vec<Link>,
    link_options: LinkOptions,
}

impl GraphModel {
    /// Cluster `nodes` from scratch.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateNode`] if two nodes share an id.
    /// - [`Error::DimensionMismatch`] if embeddings are ragged or `weights` has the
    ///   wrong length.
    /// - Any partitioning error, e.g. a cluster count outside `[2, n - 1]`.
    pub fn new(
        nodes: Vec<Node>,
        weights: AttributeWeights,
        strategy: Strategy,
        link_options: LinkOptions,
    ) -> Result<Self> {
        Self::build(nodes, weights, strategy, None, link_options)
    }

    /// Start from a partition that was already fitted, e.g. the one elbow selection
    /// scored, instead of fitting again.
    ///
    /// # Errors
    ///
    /// As [`GraphModel::new`], plus [`Error::InvalidParameter`] if `partition` does not
    /// cover every node or its cluster count differs from `strategy`'s.
    pub fn with_partition(
        nodes: Vec<Node>,
        weights: AttributeWeights,
        strategy: Strategy,
        partition: Partition,
        link_options: LinkOptions,
    ) -> Result<Self> {
        Self::build(nodes, weights, strategy, Some(partition), link_options)
    }

    fn build(
        nodes: Vec<Node>,
        weights: AttributeWeights,
        strategy: Strategy,
        initial: Option<Partition>,
        link_options: LinkOptions,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(Error::DuplicateNode(node.id));
            }
        }
        let embeddings: Vec<Vec<f32>> = nodes.iter().map(|n| n.embedding.clone()).collect();
        let d = check_dimensions(&embeddings)?;
        if weights.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: weights.len(),
            });
        }

        let matrix = compute_distance_matrix(&embeddings, weights.as_slice())?;
        let partition = match initial {
            Some(partition) => {
                check_partition(&partition, embeddings.len(), strategy.n_clusters())?;
                partition
            }
            None => strategy.partition(&embeddings, weights.as_slice(), None)?,
        };

        let mut model = Self {
            nodes,
            index,
            embeddings,
            centroids: Vec::new(),
            weights,
            matrix,
            partition,
            strategy,
            links: Vec::new(),
            link_options,
        };
        model.apply();
        Ok(model)
    }

    /// Rerun the pipeline under the current weights.
    ///
    /// With `seeded`, partitioning starts from the current centers so labels stay put.
    pub fn recompute(&mut self, seeded: bool) -> Result<()> {
        let strategy = self.strategy.clone();
        self.recompute_with(strategy, seeded)
    }

    /// Rerun the pipeline with a different strategy, e.g. a new `k`.
    ///
    /// The strategy is only kept if the pass succeeds.
    pub fn recompute_with(&mut self, strategy: Strategy, seeded: bool) -> Result<()> {
        let weights = self.weights.as_slice();
        let matrix = compute_distance_matrix(&self.embeddings, weights)?;
        let seeds = seeded.then_some(&self.partition.centers[..]);
        let partition = strategy.partition(&self.embeddings, weights, seeds)?;
        debug!(
            k = partition.k(),
            iterations = partition.iterations,
            converged = partition.converged,
            "recomputed clustering"
        );

        self.matrix = matrix;
        self.partition = partition;
        self.strategy = strategy;
        self.apply();
        Ok(())
    }

    /// Push matrix and partition into nodes, centroids and links.
    fn apply(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.distances = ids
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, &id)| (id, self.matrix.get(i, j)))
                .collect();
            node.cluster = self.partition.assignments[i];
        }

        let previous: HashMap<ClusterId, Option<Point>> =
            self.centroids.iter().map(|c| (c.cluster, c.position)).collect();
        self.centroids = self
            .partition
            .centers
            .iter()
            .enumerate()
            .map(|(cluster, center)| CentroidNode {
                cluster,
                center: center.clone(),
                medoid: self
                    .partition
                    .medoids
                    .as_ref()
                    .and_then(|m| m.get(cluster))
                    .map(|&i| ids[i]),
                position: previous.get(&cluster).copied().flatten(),
            })
            .collect();

        self.links = build_links(&self.nodes, &self.centroids, &self.link_options);
    }

    /// Ordinary nodes in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ordinary node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Mutable ordinary node by id, for position updates.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.nodes[i]),
            None => None,
        }
    }

    /// Centroid nodes, one per cluster.
    pub fn centroids(&self) -> &[CentroidNode] {
        &self.centroids
    }

    /// Mutable centroid node.
    pub fn centroid_mut(&mut self, cluster: ClusterId) -> Option<&mut CentroidNode> {
        self.centroids.get_mut(cluster)
    }

    /// Current edge set.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Current normalized distance matrix, indexed in node order.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Current partition, indexed in node order.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Current attribute weights.
    pub fn weights(&self) -> &AttributeWeights {
        &self.weights
    }

    /// Configured strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.partition.k()
    }

    /// Cluster of every ordinary node.
    pub fn assignment(&self) -> BTreeMap<NodeId, ClusterId> {
        self.nodes.iter().map(|n| (n.id, n.cluster)).collect()
    }

    /// Cluster of either kind of node.
    pub fn cluster_of_ref(&self, r: NodeRef) -> Option<ClusterId> {
        match r {
            NodeRef::Ordinary(id) => self.node(id).map(|n| n.cluster),
            NodeRef::Centroid(c) => (c < self.centroids.len()).then_some(c),
        }
    }

    /// `(cluster, position)` for every ordinary node, for hull building.
    pub fn hull_members(&self) -> impl Iterator<Item = (ClusterId, Option<Point>)> + '_ {
        self.nodes.iter().map(|n| (n.cluster, n.position))
    }
}

fn check_partition(partition: &Partition, n: usize, k: usize) -> Result<()> {
    if partition.assignments.len() != n {
        return Err(Error::InvalidParameter {
            name: "partition",
            message: "must assign every node",
        });
    }
    if partition.k() != k || partition.assignments.iter().any(|&c| c >= k) {
        return Err(Error::InvalidParameter {
            name: "partition",
            message: "cluster count differs from the strategy's",
        });
    }
    Ok(())
}

impl ReclusterTarget for GraphModel {
    fn embedding(&self, node: NodeId) -> Option<&[f32]> {
        self.node(node).map(|n| n.embedding.as_slice())
    }

    fn cluster_of(&self, node: NodeId) -> Option<ClusterId> {
        self.node(node).map(|n| n.cluster)
    }

    fn center(&self, cluster: ClusterId) -> Option<&[f32]> {
        if self.partition.assignments.contains(&cluster) {
            self.partition.centers.get(cluster).map(Vec::as_slice)
        } else {
            None
        }
    }

    fn centers(&self) -> &[Vec<f32>] {
        &self.partition.centers
    }

    fn weights_mut(&mut self) -> &mut AttributeWeights {
        &mut self.weights
    }

    fn recluster(&mut self) -> Result<()> {
        self.recompute(true)
    }
}
