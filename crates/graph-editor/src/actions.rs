use crate::camera::Ray;
use crate::effects::Effect;
use crate::interaction::{InteractionMode, PointerTarget};
use crate::store::Store;
use scene_graph::{EdgeId, EdgePatch, NodeId, NodePatch, NodeSpec};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone)]
pub enum Action {
    // Interaction
    /// Switch between view, move, edit and connect
    SetMode { mode: InteractionMode },
    /// Pointer pressed over a node, an edge or the background
    PointerDown {
        target: PointerTarget,
        ray: Option<Ray>,
    },
    /// Pointer moved; only matters while dragging
    PointerMove { ray: Ray },
    /// Pointer released anywhere
    PointerUp,

    // Graph edits
    /// Add a node; `None` uses the configured defaults
    AddNode { spec: Option<NodeSpec> },
    /// Connect two nodes with a default-styled edge
    Connect { from: NodeId, to: NodeId },
    /// Live edit of node fields, committed later
    EditNode { id: NodeId, patch: NodePatch },
    /// Live edit of edge fields, committed later
    EditEdge { id: EdgeId, patch: EdgePatch },
    /// Commit pending live edits (field blur)
    CommitEdits,
    RemoveNode { id: NodeId },
    RemoveEdge { id: EdgeId },
    DeleteSelectedNode,
    DeleteSelectedEdge,
    /// Empty the graph
    Reset,

    // History
    Undo,
    Redo,

    // Search
    /// Highlight matches for `query`
    Search { query: String, now: Instant },
    /// Expire highlights whose deadline has passed
    Tick { now: Instant },

    // Documents
    /// Replace the graph with a JSON document
    ImportDocument { json: String },
    /// Save current graph to file
    SaveToFile { path: PathBuf },
    /// Load graph from file
    LoadFromFile { path: PathBuf },
    /// Clear any error message
    ClearErrorMessage,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Interaction
        Action::SetMode { mode } => {
            store.set_mode(mode);
            vec![]
        }
        Action::PointerDown { target, ray } => {
            store.pointer_down(target, ray);
            vec![]
        }
        Action::PointerMove { ray } => {
            store.pointer_move(&ray);
            vec![]
        }
        Action::PointerUp => {
            store.pointer_up();
            vec![]
        }

        // Graph edits
        Action::AddNode { spec } => {
            if let Err(e) = store.add_node_from(spec) {
                warn!("add node rejected: {e}");
                store.error_message = Some(format!("Failed to add node: {e}"));
            }
            vec![]
        }
        Action::Connect { from, to } => {
            if let Err(e) = store.connect(from, to) {
                warn!("connect rejected: {e}");
            }
            vec![]
        }
        Action::EditNode { id, patch } => {
            if let Err(e) = store.apply_live_node(id, &patch) {
                warn!("node edit rejected: {e}");
            }
            vec![]
        }
        Action::EditEdge { id, patch } => {
            if let Err(e) = store.apply_live_edge(id, &patch) {
                warn!("edge edit rejected: {e}");
            }
            vec![]
        }
        Action::CommitEdits => {
            store.commit();
            vec![]
        }
        Action::RemoveNode { id } => {
            if let Err(e) = store.remove_node(id) {
                warn!("remove rejected: {e}");
            }
            vec![]
        }
        Action::RemoveEdge { id } => {
            if let Err(e) = store.remove_edge(id) {
                warn!("remove rejected: {e}");
            }
            vec![]
        }
        Action::DeleteSelectedNode => {
            store.delete_selected_node();
            vec![]
        }
        Action::DeleteSelectedEdge => {
            store.delete_selected_edge();
            vec![]
        }
        Action::Reset => {
            store.reset();
            vec![]
        }

        // History
        Action::Undo => {
            store.undo();
            vec![]
        }
        Action::Redo => {
            store.redo();
            vec![]
        }

        // Search
        Action::Search { query, now } => {
            store.search(&query, now);
            vec![]
        }
        Action::Tick { now } => {
            store.tick(now);
            vec![]
        }

        // Documents
        Action::ImportDocument { json } => {
            // Failures are recorded in `error_message` by the store.
            let _ = store.import_json(&json);
            vec![]
        }
        Action::SaveToFile { path } => {
            vec![Effect::SaveToFile { path }]
        }
        Action::LoadFromFile { path } => {
            vec![Effect::LoadFromFile { path }]
        }
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_actions_become_effects() {
        let mut store = Store::default();
        let path = PathBuf::from("graph.json");
        let effects = update(
            &mut store,
            Action::SaveToFile { path: path.clone() },
        );
        assert!(matches!(
            effects.as_slice(),
            [Effect::SaveToFile { path: p }] if *p == path
        ));
        assert!(
            update(&mut store, Action::Undo).is_empty(),
            "graph actions run synchronously"
        );
    }

    #[test]
    fn test_clear_error_message() {
        let mut store = Store::default();
        update(
            &mut store,
            Action::ImportDocument {
                json: "not json".to_string(),
            },
        );
        assert!(store.error_message.is_some());
        update(&mut store, Action::ClearErrorMessage);
        assert!(store.error_message.is_none());
    }

    #[test]
    fn test_edit_then_commit_is_one_undo_step() {
        let mut store = Store::default();
        update(
            &mut store,
            Action::AddNode {
                spec: Some(NodeSpec::labelled("A")),
            },
        );
        let id = store.graph().nodes().next().unwrap().id;
        let len = store.history().len();

        for text in ["B", "Be", "Bet"] {
            update(
                &mut store,
                Action::EditNode {
                    id,
                    patch: NodePatch::label(text),
                },
            );
        }
        update(&mut store, Action::CommitEdits);
        assert_eq!(store.history().len(), len + 1);
    }
}
