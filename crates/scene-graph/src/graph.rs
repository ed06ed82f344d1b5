use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Direction;
use std::collections::HashMap;

use crate::model::{
    Edge, EdgeId, EdgePatch, EdgeSpec, GraphSnapshot, Node, NodeId,
    NodePatch, NodeSpec,
};

/// Canonical node and edge collections with id-indexed lookup.
///
/// Edge endpoints are stored twice: as stable graph links and as the
/// `from`/`to` fields of the edge payload. Endpoints never change after
/// creation, so the two cannot drift. Stable graph indices never leak out;
/// callers only see [`NodeId`] and [`EdgeId`].
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: StableGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            next_edge_id: 1,
            ..Self::default()
        }
    }

    /// Build a store holding exactly the contents of `snapshot`.
    pub fn from_snapshot(
        snapshot: &GraphSnapshot,
    ) -> Result<Self, GraphError> {
        let mut store = Self::new();
        store.load(snapshot)?;
        Ok(store)
    }

    /// Replace the contents with `snapshot`.
    ///
    /// The snapshot is validated before anything is touched, so a rejected
    /// snapshot leaves the store unchanged. Id allocation stays monotonic
    /// across restores.
    pub fn restore(
        &mut self,
        snapshot: &GraphSnapshot,
    ) -> Result<(), GraphError> {
        let mut rebuilt = Self::new();
        rebuilt.load(snapshot)?;
        rebuilt.next_node_id = rebuilt.next_node_id.max(self.next_node_id);
        rebuilt.next_edge_id = rebuilt.next_edge_id.max(self.next_edge_id);
        *self = rebuilt;
        Ok(())
    }

    fn load(&mut self, snapshot: &GraphSnapshot) -> Result<(), GraphError> {
        self.graph = StableGraph::with_capacity(
            snapshot.nodes.len(),
            snapshot.edges.len(),
        );
        self.node_index.clear();
        self.edge_index.clear();

        for node in &snapshot.nodes {
            if self.node_index.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            if !node.is_finite() {
                return Err(GraphError::NonFiniteNode(node.id));
            }
            let next = next_id(node.id.0)?;
            let idx = self.graph.add_node(node.clone());
            self.node_index.insert(node.id, idx);
            self.next_node_id = self.next_node_id.max(next);
        }

        for edge in &snapshot.edges {
            if self.edge_index.contains_key(&edge.id) {
                return Err(GraphError::DuplicateEdge(edge.id));
            }
            if !edge.is_finite() {
                return Err(GraphError::NonFiniteEdge(edge.id));
            }
            let next = next_id(edge.id.0)?;
            let source = self.index_of(edge.from)?;
            let target = self.index_of(edge.to)?;
            let idx = self.graph.add_edge(source, target, edge.clone());
            self.edge_index.insert(edge.id, idx);
            self.next_edge_id = self.next_edge_id.max(next);
        }

        Ok(())
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex, GraphError> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(GraphError::InvalidReference(id))
    }

    // --------------------------------------------------------------
    // Mutations
    // --------------------------------------------------------------

    pub fn add_node(
        &mut self,
        spec: NodeSpec,
    ) -> Result<NodeId, GraphError> {
        let id = NodeId(self.next_node_id);
        self.next_node_id = next_id(id.0)?;
        let idx = self.graph.add_node(Node::from_spec(id, spec));
        self.node_index.insert(id, idx);
        Ok(id)
    }

    /// Add an edge with default styling.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
    ) -> Result<EdgeId, GraphError> {
        self.add_edge_with(from, to, EdgeSpec::default())
    }

    pub fn add_edge_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        spec: EdgeSpec,
    ) -> Result<EdgeId, GraphError> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id = next_id(id.0)?;
        let idx = self.graph.add_edge(
            source,
            target,
            Edge::from_spec(id, from, to, spec),
        );
        self.edge_index.insert(id, idx);
        Ok(id)
    }

    pub fn update_node(
        &mut self,
        id: NodeId,
        patch: &NodePatch,
    ) -> Result<(), GraphError> {
        let idx = self
            .node_index
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound(id))?;
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.apply(patch);
        }
        Ok(())
    }

    pub fn update_edge(
        &mut self,
        id: EdgeId,
        patch: &EdgePatch,
    ) -> Result<(), GraphError> {
        let idx = self
            .edge_index
            .get(&id)
            .copied()
            .ok_or(GraphError::EdgeNotFound(id))?;
        if let Some(edge) = self.graph.edge_weight_mut(idx) {
            edge.apply(patch);
        }
        Ok(())
    }

    /// Remove a node together with every edge that starts or ends at it.
    ///
    /// Returns the ids of the removed edges.
    pub fn remove_node(
        &mut self,
        id: NodeId,
    ) -> Result<Vec<EdgeId>, GraphError> {
        let idx = self
            .node_index
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound(id))?;

        let mut incident: Vec<EdgeId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        incident.sort();
        incident.dedup();

        // StableGraph drops the incident edges along with the node.
        self.graph.remove_node(idx);
        self.node_index.remove(&id);
        for edge_id in &incident {
            self.edge_index.remove(edge_id);
        }

        Ok(incident)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let idx = self
            .edge_index
            .remove(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        self.graph
            .remove_edge(idx)
            .ok_or(GraphError::EdgeNotFound(id))
    }

    /// Drop every node and edge. Id allocation keeps counting.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
    }

    // --------------------------------------------------------------
    // Reads
    // --------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge_index.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Independent copy of the current collections, in store order.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.graph.node_weights().cloned().collect(),
            edges: self.graph.edge_weights().cloned().collect(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{0} does not exist")]
    InvalidReference(NodeId),
    #[error("{0} not found")]
    NodeNotFound(NodeId),
    #[error("{0} not found")]
    EdgeNotFound(EdgeId),
    #[error("duplicate {0}")]
    DuplicateNode(NodeId),
    #[error("duplicate {0}")]
    DuplicateEdge(EdgeId),
    #[error("{0} has a non-finite coordinate or size")]
    NonFiniteNode(NodeId),
    #[error("{0} has a non-finite width")]
    NonFiniteEdge(EdgeId),
    #[error("no identifiers left to allocate")]
    IdSpaceExhausted,
}

/// Identifier following `id`, or an error once the id space is used up.
fn next_id(id: u64) -> Result<u64, GraphError> {
    id.checked_add(1).ok_or(GraphError::IdSpaceExhausted)
}

impl GraphError {
    /// True for the "target does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_)
        )
    }
}
