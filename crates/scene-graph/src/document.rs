use std::path::Path;

use crate::graph::{GraphError, GraphStore};
use crate::model::GraphSnapshot;

// ------------------------------------------------------------------
// JSON document
// ------------------------------------------------------------------

/// Render a snapshot as the on-disk JSON document.
///
/// Output only depends on the snapshot, so saving the same graph twice
/// produces identical bytes.
pub fn to_json(snapshot: &GraphSnapshot) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(snapshot).map_err(DocumentError::Serialize)
}

/// Parse a JSON document into a snapshot the store can hold.
///
/// Absent `nodes` or `edges` members count as empty. Duplicate ids and
/// edges naming unknown nodes are rejected.
pub fn from_json(json: &str) -> Result<GraphSnapshot, DocumentError> {
    let snapshot: GraphSnapshot = serde_json::from_str(json)?;
    GraphStore::from_snapshot(&snapshot)?;
    Ok(snapshot)
}

// ------------------------------------------------------------------
// File I/O operations
// ------------------------------------------------------------------

pub fn save_to_file(
    snapshot: &GraphSnapshot,
    path: &Path,
) -> Result<(), DocumentError> {
    let json = to_json(snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<GraphSnapshot, DocumentError> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("failed to access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("document is inconsistent: {0}")]
    Invalid(#[from] GraphError),
    #[error("failed to serialize graph: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl DocumentError {
    /// The document was read but does not describe a valid graph.
    pub fn is_malformed_import(&self) -> bool {
        matches!(
            self,
            DocumentError::Malformed(_) | DocumentError::Invalid(_)
        )
    }
}
