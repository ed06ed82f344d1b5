use scene_graph::{EdgeId, GraphStore, NodeId};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Camera control only; pointer-down on the graph is inert.
    #[default]
    View,
    /// Pointer-down on a node starts dragging it.
    Move,
    /// Pointer-down selects a node or an edge for editing.
    Edit,
    /// Two node clicks create an edge between them.
    Connect,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 4] = [
        InteractionMode::View,
        InteractionMode::Move,
        InteractionMode::Edit,
        InteractionMode::Connect,
    ];
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Node(NodeId),
    Edge(EdgeId),
    Background,
}

/// What the editor store has to do in response to a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    None,
    BeginDrag(NodeId),
    Selected,
    ConnectPending(NodeId),
    Connect { from: NodeId, to: NodeId },
}

/// Mode, selection and pending connection of the single editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    mode: InteractionMode,
    selected_node: Option<NodeId>,
    selected_edge: Option<EdgeId>,
    connect_from: Option<NodeId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected_node
    }

    pub fn selected_edge(&self) -> Option<EdgeId> {
        self.selected_edge
    }

    pub fn connect_from(&self) -> Option<NodeId> {
        self.connect_from
    }

    /// Switch modes. Any half-built connection is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) -> bool {
        self.connect_from = None;
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn select_node(&mut self, id: NodeId) {
        self.selected_node = Some(id);
        self.selected_edge = None;
    }

    pub fn select_edge(&mut self, id: EdgeId) {
        self.selected_edge = Some(id);
        self.selected_node = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_edge = None;
    }

    /// Interpret a pointer-down according to the current mode.
    pub fn pointer_down(&mut self, target: PointerTarget) -> Intent {
        match (self.mode, target) {
            (InteractionMode::View, _) => Intent::None,
            (InteractionMode::Move, PointerTarget::Node(id)) => {
                Intent::BeginDrag(id)
            }
            (InteractionMode::Edit, PointerTarget::Node(id)) => {
                self.select_node(id);
                Intent::Selected
            }
            (InteractionMode::Edit, PointerTarget::Edge(id)) => {
                self.select_edge(id);
                Intent::Selected
            }
            (InteractionMode::Connect, PointerTarget::Node(id)) => {
                match self.connect_from.take() {
                    None => {
                        self.connect_from = Some(id);
                        Intent::ConnectPending(id)
                    }
                    Some(from) => Intent::Connect { from, to: id },
                }
            }
            _ => Intent::None,
        }
    }

    /// Drop references to nodes and edges that are no longer in `graph`.
    pub fn forget_missing(&mut self, graph: &GraphStore) {
        if self.selected_node.is_some_and(|id| !graph.contains_node(id)) {
            self.selected_node = None;
        }
        if self.selected_edge.is_some_and(|id| !graph.contains_edge(id)) {
            self.selected_edge = None;
        }
        if self.connect_from.is_some_and(|id| !graph.contains_node(id)) {
            self.connect_from = None;
        }
    }
}
