pub mod document;
pub mod graph;
pub mod history;
pub mod model;

pub use document::DocumentError;
pub use graph::{GraphError, GraphStore};
pub use history::{History, HistoryError};
pub use model::{
    Edge, EdgeId, EdgePatch, EdgeSpec, GraphSnapshot, Node, NodeId,
    NodePatch, NodeSpec, ScalarRange, Shape, EDGE_WIDTH_RANGE,
    NODE_SIZE_RANGE, TEXT_SIZE_RANGE,
};
