use glam::Vec3;
use rand::Rng;
use scene_graph::document::{self, DocumentError};
use scene_graph::{
    EdgeId, EdgePatch, GraphError, GraphSnapshot, GraphStore, History,
    HistoryError, NodeId, NodePatch, NodeSpec,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::camera::{Plane, Ray};
use crate::drag::{DragOutcome, DragSession};
use crate::highlight::Highlights;
use crate::interaction::{InteractionMode, Intent, PointerTarget, Session};
use crate::settings::EditorSettings;

/// Everything the editor owns: live graph, undo log, interaction session,
/// search highlights and the active drag.
///
/// All access goes through this one value. Structural edits commit a
/// snapshot immediately; live edits (typing, dragging) change the graph
/// and are committed on the next boundary: pointer-up, mode change, an
/// explicit [`Store::commit`], or any structural edit.
pub struct Store {
    graph: GraphStore,
    history: History,
    session: Session,
    highlights: Highlights,
    drag: Option<DragSession>,
    pub settings: EditorSettings,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(settings: EditorSettings) -> Self {
        let mut store = Self {
            graph: GraphStore::new(),
            history: match settings.history_limit {
                Some(limit) => History::with_limit(limit),
                None => History::new(),
            },
            session: Session::new(),
            highlights: Highlights::new(settings.highlight_duration()),
            drag: None,
            settings,
            error_message: None,
        };
        store.commit();
        store
    }

    /// Start editing an existing graph; it becomes the first undo entry.
    pub fn with_snapshot(
        snapshot: &GraphSnapshot,
        settings: EditorSettings,
    ) -> Result<Self, GraphError> {
        let graph = GraphStore::from_snapshot(snapshot)?;
        let mut store = Self::new(settings);
        store.graph = graph;
        store.history.clear();
        store.commit();
        Ok(store)
    }

    // --------------------------------------------------------------
    // Reads
    // --------------------------------------------------------------

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> InteractionMode {
        self.session.mode()
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn dragging(&self) -> Option<NodeId> {
        self.drag.as_ref().map(DragSession::node)
    }

    /// True while the live graph holds edits not yet in the undo log.
    pub fn has_pending_edits(&self) -> bool {
        self.history.current() != Some(&self.graph.snapshot())
    }

    // --------------------------------------------------------------
    // History
    // --------------------------------------------------------------

    /// Push the live graph onto the undo log if it differs from the
    /// current entry. Returns whether a snapshot was pushed.
    pub fn commit(&mut self) -> bool {
        let snapshot = self.graph.snapshot();
        if self.history.current() == Some(&snapshot) {
            return false;
        }
        self.history.push(snapshot);
        debug!(
            index = ?self.history.index(),
            len = self.history.len(),
            "committed snapshot"
        );
        true
    }

    pub fn undo(&mut self) -> bool {
        self.settle();
        let restored = match self.history.undo() {
            Ok(snapshot) => self.graph.restore(snapshot),
            Err(HistoryError::NoHistory) => {
                debug!("nothing to undo");
                return false;
            }
        };
        self.after_restore(restored);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.settle();
        let restored = match self.history.redo() {
            Ok(snapshot) => self.graph.restore(snapshot),
            Err(HistoryError::NoHistory) => {
                debug!("nothing to redo");
                return false;
            }
        };
        self.after_restore(restored);
        true
    }

    fn after_restore(&mut self, restored: Result<(), GraphError>) {
        if let Err(e) = restored {
            warn!("history snapshot rejected: {e}");
            self.error_message = Some(format!("Failed to restore: {e}"));
        }
        self.session.forget_missing(&self.graph);
    }

    /// Close any drag and commit pending live edits.
    fn settle(&mut self) {
        self.end_drag();
        self.commit();
    }

    // --------------------------------------------------------------
    // Structural edits
    // --------------------------------------------------------------

    pub fn add_node(
        &mut self,
        spec: NodeSpec,
    ) -> Result<NodeId, GraphError> {
        self.settle();
        let id = self.graph.add_node(spec)?;
        self.commit();
        info!(%id, "added node");
        Ok(id)
    }

    /// Add a node styled from the settings, with a palette colour and a
    /// random position on the drag plane.
    pub fn add_default_node(&mut self) -> Result<NodeId, GraphError> {
        let ordinal = self.graph.node_count();
        let mut spec = self.settings.nodes.spec(ordinal + 1);
        let palette = &colorous::TABLEAU10;
        spec.color = format!("#{:x}", palette[ordinal % palette.len()]);
        spec.position = self.spawn_position().to_array();
        self.add_node(spec)
    }

    /// `add_node` for an explicit spec, `add_default_node` otherwise.
    pub fn add_node_from(
        &mut self,
        spec: Option<NodeSpec>,
    ) -> Result<NodeId, GraphError> {
        match spec {
            Some(spec) => self.add_node(spec),
            None => self.add_default_node(),
        }
    }

    fn spawn_position(&self) -> Vec3 {
        let extent = self.settings.nodes.spawn_extent.abs();
        if !extent.is_finite() {
            warn!(extent, "spawn extent is not finite, spawning at origin");
            return Plane::from(self.settings.drag_plane).origin();
        }
        let mut rng = rand::rng();
        let point = Vec3::new(
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
        );
        let plane = Plane::from(self.settings.drag_plane);
        point - plane.normal * (plane.normal.dot(point) - plane.distance)
    }

    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
    ) -> Result<EdgeId, GraphError> {
        self.settle();
        let id = self
            .graph
            .add_edge_with(from, to, self.settings.edges.spec())?;
        self.commit();
        info!(%id, %from, %to, "connected nodes");
        Ok(id)
    }

    pub fn remove_node(
        &mut self,
        id: NodeId,
    ) -> Result<Vec<EdgeId>, GraphError> {
        self.settle();
        let removed = self.graph.remove_node(id)?;
        self.session.forget_missing(&self.graph);
        self.commit();
        info!(%id, edges = removed.len(), "removed node");
        Ok(removed)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        self.settle();
        self.graph.remove_edge(id)?;
        self.session.forget_missing(&self.graph);
        self.commit();
        info!(%id, "removed edge");
        Ok(())
    }

    pub fn delete_selected_node(&mut self) -> Option<NodeId> {
        let id = self.session.selected_node()?;
        match self.remove_node(id) {
            Ok(_) => Some(id),
            Err(e) => {
                warn!("delete of selected node ignored: {e}");
                self.session.forget_missing(&self.graph);
                None
            }
        }
    }

    pub fn delete_selected_edge(&mut self) -> Option<EdgeId> {
        let id = self.session.selected_edge()?;
        match self.remove_edge(id) {
            Ok(()) => Some(id),
            Err(e) => {
                warn!("delete of selected edge ignored: {e}");
                self.session.forget_missing(&self.graph);
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.settle();
        self.graph.reset();
        self.session.clear_selection();
        self.session.forget_missing(&self.graph);
        self.highlights.clear();
        self.commit();
        info!("graph reset");
    }

    // --------------------------------------------------------------
    // Live edits
    // --------------------------------------------------------------

    /// Apply a field edit without touching the undo log.
    pub fn apply_live_node(
        &mut self,
        id: NodeId,
        patch: &NodePatch,
    ) -> Result<(), GraphError> {
        self.graph.update_node(id, patch)
    }

    pub fn apply_live_edge(
        &mut self,
        id: EdgeId,
        patch: &EdgePatch,
    ) -> Result<(), GraphError> {
        self.graph.update_edge(id, patch)
    }

    // --------------------------------------------------------------
    // Pointer input
    // --------------------------------------------------------------

    /// Switch interaction mode, ending any drag in progress.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.settle();
        if self.session.set_mode(mode) {
            debug!(?mode, "mode changed");
        }
    }

    /// Handle a pointer-down. `ray` is the pointer ray from the camera and
    /// is only needed to start a drag.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        ray: Option<Ray>,
    ) -> Intent {
        self.settle();
        let target = match target {
            PointerTarget::Node(id) if !self.graph.contains_node(id) => {
                debug!(%id, "pointer on missing node ignored");
                PointerTarget::Background
            }
            PointerTarget::Edge(id) if !self.graph.contains_edge(id) => {
                debug!(%id, "pointer on missing edge ignored");
                PointerTarget::Background
            }
            target => target,
        };
        let intent = self.session.pointer_down(target);
        match intent {
            Intent::BeginDrag(id) => self.begin_drag(id, ray),
            Intent::Connect { from, to } => {
                if let Err(e) = self.connect(from, to) {
                    warn!("connection rejected: {e}");
                }
            }
            Intent::None | Intent::Selected | Intent::ConnectPending(_) => {}
        }
        intent
    }

    fn begin_drag(&mut self, id: NodeId, ray: Option<Ray>) {
        let Some(node) = self.graph.node(id) else {
            debug!(%id, "drag on missing node ignored");
            return;
        };
        let Some(ray) = ray else {
            debug!(%id, "drag without pointer ray ignored");
            return;
        };
        let position = Vec3::from_array(node.position);
        let plane = Plane::from(self.settings.drag_plane);
        match DragSession::begin(id, position, &ray, plane) {
            Ok(session) => self.drag = Some(session),
            Err(e) => debug!(%id, "drag not started: {e}"),
        }
    }

    /// Move the dragged node to follow the pointer.
    ///
    /// Returns the node's new position, or `None` when nothing moved.
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<Vec3> {
        if self.session.mode() != InteractionMode::Move {
            return None;
        }
        let drag = self.drag.as_mut()?;
        let position = match drag.sample(ray) {
            Ok(position) => position,
            Err(e) => {
                debug!("pointer sample skipped: {e}");
                return None;
            }
        };
        let id = drag.node();
        if let Err(e) = self
            .graph
            .update_node(id, &NodePatch::position(position.to_array()))
        {
            warn!("dragged node vanished: {e}");
            self.drag = None;
            return None;
        }
        Some(position)
    }

    /// End the pointer gesture. Any drag session is torn down regardless
    /// of the current mode, and its final position is committed once.
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        self.end_drag()
    }

    fn end_drag(&mut self) -> Option<DragOutcome> {
        let outcome = self.drag.take()?.finish();
        if outcome.moved() {
            self.commit();
        }
        debug!(node = %outcome.node, samples = outcome.samples, "drag ended");
        Some(outcome)
    }

    // --------------------------------------------------------------
    // Search
    // --------------------------------------------------------------

    pub fn search(&mut self, query: &str, now: Instant) -> bool {
        let found = self.highlights.search(&self.graph, query, now);
        if found {
            debug!(
                query,
                nodes = self.highlights.nodes().len(),
                edges = self.highlights.edges().len(),
                "search highlighted matches"
            );
        }
        found
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.highlights.tick(now)
    }

    // --------------------------------------------------------------
    // Documents
    // --------------------------------------------------------------

    pub fn export_json(&self) -> Result<String, DocumentError> {
        document::to_json(&self.graph.snapshot())
    }

    /// Replace the graph with a JSON document.
    ///
    /// A document that fails to parse leaves the editor untouched and is
    /// reported through `error_message`.
    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let snapshot = match document::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("import rejected: {e}");
                self.error_message = Some(format!("Failed to load graph: {e}"));
                return Err(e);
            }
        };
        self.settle();
        self.graph.restore(&snapshot)?;
        self.session.clear_selection();
        self.session.forget_missing(&self.graph);
        self.highlights.clear();
        self.commit();
        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "imported graph"
        );
        Ok(())
    }

    pub fn save_to_file(&mut self, path: &Path) -> Result<(), DocumentError> {
        self.settle();
        document::save_to_file(&self.graph.snapshot(), path)
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<(), DocumentError> {
        match std::fs::read_to_string(path) {
            Ok(json) => self.import_json(&json),
            Err(e) => {
                warn!(path = %path.display(), "load failed: {e}");
                self.error_message = Some(format!("Failed to read file: {e}"));
                Err(e.into())
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store_with(labels: &[&str]) -> (Store, Vec<NodeId>) {
        let mut store = Store::default();
        let ids = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                store
                    .add_node(
                        NodeSpec::labelled(*label).at([i as f32, 0.0, 0.0]),
                    )
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    fn ray_to(point: Vec3) -> Ray {
        let origin = Vec3::new(0.0, 0.0, 10.0);
        Ray::new(origin, (point - origin).normalize())
    }

    fn position(store: &Store, id: NodeId) -> Vec3 {
        Vec3::from_array(store.graph().node(id).unwrap().position)
    }

    #[test]
    fn test_new_store_has_one_history_entry() {
        let store = Store::default();
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().index(), Some(0));
        assert!(!store.has_pending_edits());
    }

    #[test]
    fn test_example_scenario() {
        let mut a = GraphStore::new();
        let id_a = a.add_node(NodeSpec::labelled("A")).unwrap();
        let id_b = a.add_node(NodeSpec::labelled("B")).unwrap();
        assert_eq!((id_a, id_b), (NodeId(1), NodeId(2)));

        let mut store =
            Store::with_snapshot(&a.snapshot(), EditorSettings::default())
                .unwrap();
        store.connect(id_a, id_b).unwrap();
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history().index(), Some(1));

        assert!(store.undo());
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(store.history().index(), Some(0));

        store.connect(id_a, id_b).unwrap();
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history().index(), Some(1));
        assert!(!store.history().can_redo());
    }

    #[test]
    fn test_undo_redo_restores_same_snapshot() {
        let (mut store, ids) = store_with(&["A", "B", "C"]);
        store.connect(ids[0], ids[1]).unwrap();
        let before = store.graph().snapshot();

        assert!(store.undo());
        assert_ne!(store.graph().snapshot(), before);
        assert!(store.redo());
        assert_eq!(store.graph().snapshot(), before);
        assert!(!store.redo(), "redo at the end is a no-op");
    }

    #[test]
    fn test_connect_mode_creates_one_edge_and_commits() {
        let (mut store, ids) = store_with(&["X", "Y"]);
        store.set_mode(InteractionMode::Connect);
        let len = store.history().len();

        let first = store.pointer_down(PointerTarget::Node(ids[0]), None);
        assert_eq!(first, Intent::ConnectPending(ids[0]));
        assert_eq!(store.graph().edge_count(), 0);

        store.pointer_down(PointerTarget::Node(ids[1]), None);
        assert_eq!(store.graph().edge_count(), 1);
        assert_eq!(store.history().len(), len + 1);
        assert_eq!(store.session().connect_from(), None);

        let edge = store.graph().edges().next().unwrap();
        assert_eq!((edge.from, edge.to), (ids[0], ids[1]));
    }

    #[test]
    fn test_pointer_on_missing_node_is_inert_in_connect_mode() {
        let (mut store, ids) = store_with(&["X"]);
        store.set_mode(InteractionMode::Connect);
        store.pointer_down(PointerTarget::Node(ids[0]), None);

        let intent = store.pointer_down(PointerTarget::Node(NodeId(99)), None);
        assert_eq!(intent, Intent::None);
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(
            store.session().connect_from(),
            Some(ids[0]),
            "pending connection survives a click on nothing"
        );
    }

    #[test]
    fn test_pointer_on_missing_target_does_not_select() {
        let (mut store, ids) = store_with(&["A", "B"]);
        let edge = store.connect(ids[0], ids[1]).unwrap();
        store.set_mode(InteractionMode::Edit);
        store.pointer_down(PointerTarget::Node(ids[0]), None);

        store.pointer_down(PointerTarget::Node(NodeId(42)), None);
        store.pointer_down(PointerTarget::Edge(EdgeId(42)), None);
        assert_eq!(store.session().selected_node(), Some(ids[0]));
        assert_eq!(store.session().selected_edge(), None);

        store.remove_edge(edge).unwrap();
        store.pointer_down(PointerTarget::Edge(edge), None);
        assert_eq!(store.session().selected_edge(), None);
        assert_eq!(store.delete_selected_edge(), None);
    }

    #[test]
    fn test_drag_commits_exactly_one_snapshot() {
        let (mut store, ids) = store_with(&["A"]);
        let node = ids[0];
        store.set_mode(InteractionMode::Move);
        let len = store.history().len();

        let p0 = position(&store, node);
        let grab = p0 + Vec3::new(0.25, -0.5, 0.0);
        store.pointer_down(PointerTarget::Node(node), Some(ray_to(grab)));
        assert_eq!(store.dragging(), Some(node));

        for i in 1..=30 {
            store.pointer_move(&ray_to(Vec3::new(i as f32 * 0.1, 1.0, 0.0)));
        }
        let p1 = Vec3::new(3.0, 2.0, 0.0);
        store.pointer_move(&ray_to(p1));
        assert_eq!(store.history().len(), len, "no per-sample history");

        let outcome = store.pointer_up().unwrap();
        assert_eq!(outcome.samples, 31);
        assert_eq!(store.history().len(), len + 1);
        assert_eq!(store.dragging(), None);

        let expected = p1 - (grab - p0);
        assert!((position(&store, node) - expected).length() < 1e-4);

        assert!(store.undo());
        assert!((position(&store, node) - p0).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_sample_keeps_node_and_session() {
        let (mut store, ids) = store_with(&["A"]);
        store.set_mode(InteractionMode::Move);
        let p0 = position(&store, ids[0]);
        store.pointer_down(PointerTarget::Node(ids[0]), Some(ray_to(p0)));

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::X);
        assert_eq!(store.pointer_move(&parallel), None);
        assert_eq!(store.dragging(), Some(ids[0]));
        assert_eq!(position(&store, ids[0]), p0);
    }

    #[test]
    fn test_pointer_up_without_movement_adds_no_history() {
        let (mut store, ids) = store_with(&["A"]);
        store.set_mode(InteractionMode::Move);
        let len = store.history().len();
        let p0 = position(&store, ids[0]);
        store.pointer_down(PointerTarget::Node(ids[0]), Some(ray_to(p0)));
        store.pointer_up();
        assert_eq!(store.history().len(), len);
    }

    #[test]
    fn test_mode_change_mid_drag_tears_down_session() {
        let (mut store, ids) = store_with(&["A"]);
        store.set_mode(InteractionMode::Move);
        let p0 = position(&store, ids[0]);
        store.pointer_down(PointerTarget::Node(ids[0]), Some(ray_to(p0)));
        store.pointer_move(&ray_to(Vec3::new(2.0, 2.0, 0.0)));
        let len = store.history().len();

        store.set_mode(InteractionMode::Edit);
        assert_eq!(store.dragging(), None);
        assert_eq!(store.history().len(), len + 1);
        assert_eq!(store.pointer_move(&ray_to(Vec3::ZERO)), None);
        assert!(store.pointer_up().is_none());
    }

    #[test]
    fn test_live_edits_commit_once() {
        let (mut store, ids) = store_with(&["A"]);
        let len = store.history().len();

        for text in ["H", "He", "Hel", "Hell", "Hello"] {
            store.apply_live_node(ids[0], &NodePatch::label(text)).unwrap();
        }
        assert_eq!(store.history().len(), len);
        assert!(store.has_pending_edits());

        assert!(store.commit());
        assert!(!store.commit(), "second commit has nothing to push");
        assert_eq!(store.history().len(), len + 1);

        assert!(store.undo());
        assert_eq!(store.graph().node(ids[0]).unwrap().label, "A");
    }

    #[test]
    fn test_undo_commits_pending_live_edit_first() {
        let (mut store, ids) = store_with(&["A"]);
        store.apply_live_node(ids[0], &NodePatch::label("B")).unwrap();
        assert!(store.undo());
        assert_eq!(store.graph().node(ids[0]).unwrap().label, "A");
        assert!(store.redo());
        assert_eq!(store.graph().node(ids[0]).unwrap().label, "B");
    }

    #[test]
    fn test_live_edit_of_missing_node_is_not_found() {
        let mut store = Store::default();
        assert_eq!(
            store.apply_live_node(NodeId(5), &NodePatch::label("x")),
            Err(GraphError::NodeNotFound(NodeId(5)))
        );
        assert_eq!(
            store.apply_live_edge(EdgeId(5), &EdgePatch::label("x")),
            Err(GraphError::EdgeNotFound(EdgeId(5)))
        );
    }

    #[test]
    fn test_delete_selected_node_cascades_and_clears_selection() {
        let (mut store, ids) = store_with(&["A", "B", "C"]);
        store.connect(ids[0], ids[1]).unwrap();
        let kept = store.connect(ids[1], ids[2]).unwrap();
        store.set_mode(InteractionMode::Edit);
        store.pointer_down(PointerTarget::Node(ids[0]), None);
        let len = store.history().len();

        assert_eq!(store.delete_selected_node(), Some(ids[0]));
        assert_eq!(store.session().selected_node(), None);
        assert_eq!(store.history().len(), len + 1);
        let remaining: Vec<EdgeId> =
            store.graph().edges().map(|e| e.id).collect();
        assert_eq!(remaining, vec![kept]);

        assert_eq!(store.delete_selected_node(), None);
    }

    #[test]
    fn test_delete_selected_edge() {
        let (mut store, ids) = store_with(&["A", "B"]);
        let edge = store.connect(ids[0], ids[1]).unwrap();
        store.set_mode(InteractionMode::Edit);
        store.pointer_down(PointerTarget::Edge(edge), None);

        assert_eq!(store.delete_selected_edge(), Some(edge));
        assert_eq!(store.session().selected_edge(), None);
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(store.graph().node_count(), 2);
    }

    #[test]
    fn test_undo_clears_selection_of_vanished_node() {
        let (mut store, _) = store_with(&["A"]);
        let added = store.add_node(NodeSpec::labelled("B")).unwrap();
        store.set_mode(InteractionMode::Edit);
        store.pointer_down(PointerTarget::Node(added), None);

        assert!(store.undo());
        assert_eq!(store.session().selected_node(), None);
    }

    #[test]
    fn test_reset_is_undoable() {
        let (mut store, ids) = store_with(&["A", "B"]);
        store.connect(ids[0], ids[1]).unwrap();
        let before = store.graph().snapshot();

        store.reset();
        assert!(store.graph().is_empty());
        assert!(store.undo());
        assert_eq!(store.graph().snapshot(), before);
    }

    #[test]
    fn test_malformed_import_preserves_state() {
        let (mut store, _) = store_with(&["A", "B"]);
        let before = store.graph().snapshot();
        let len = store.history().len();

        let err = store.import_json("{ \"nodes\": [ { \"id\": 1 } ] }");
        assert!(err.unwrap_err().is_malformed_import());
        assert_eq!(store.graph().snapshot(), before);
        assert_eq!(store.history().len(), len);
        assert!(store.error_message.is_some(), "failure must be surfaced");
    }

    #[test]
    fn test_import_of_largest_id_preserves_state() {
        let (mut store, _) = store_with(&["A"]);
        let before = store.graph().snapshot();
        let len = store.history().len();

        let err = store
            .import_json(
                r#"{"nodes":[{"id":18446744073709551615,"position":[0,0,0]}]}"#,
            )
            .unwrap_err();
        assert!(err.is_malformed_import());
        assert_eq!(store.graph().snapshot(), before);
        assert_eq!(store.history().len(), len);
        assert!(store.error_message.is_some());
    }

    #[test]
    fn test_non_finite_positions_do_not_grow_history() {
        let (mut store, ids) = store_with(&["A"]);
        let nan = [f32::NAN, 0.0, 0.0];
        let added = store.add_node(NodeSpec::labelled("B").at(nan)).unwrap();
        assert_eq!(position(&store, added), Vec3::ZERO);
        store
            .apply_live_node(ids[0], &NodePatch::position(nan))
            .unwrap();
        let len = store.history().len();

        store.set_mode(InteractionMode::Edit);
        store.pointer_down(PointerTarget::Background, None);
        store.pointer_down(PointerTarget::Background, None);
        assert!(!store.commit());
        assert_eq!(store.history().len(), len);
        assert!(!store.has_pending_edits());

        let json = store.export_json().unwrap();
        let mut other = Store::default();
        other.import_json(&json).unwrap();
        assert_eq!(other.graph().snapshot(), store.graph().snapshot());
    }

    #[test]
    fn test_infinite_spawn_extent_spawns_on_plane_origin() {
        let mut settings = EditorSettings::default();
        settings.nodes.spawn_extent = f32::INFINITY;
        let mut store = Store::new(settings);
        let id = store.add_default_node().unwrap();
        assert_eq!(position(&store, id), Vec3::ZERO);
    }

    #[test]
    fn test_export_import_round_trip() {
        let (mut store, ids) = store_with(&["A", "B"]);
        store.connect(ids[0], ids[0]).unwrap();
        let json = store.export_json().unwrap();

        let mut other = Store::default();
        other.import_json(&json).unwrap();
        assert_eq!(other.graph().snapshot(), store.graph().snapshot());
        assert_eq!(other.export_json().unwrap(), json);
    }

    #[test]
    fn test_load_missing_file_reports_error() {
        let mut store = Store::default();
        let path = std::env::temp_dir().join("graph_editor_missing.json");
        std::fs::remove_file(&path).ok();
        assert!(store.load_from_file(&path).is_err());
        assert!(store.error_message.is_some());
    }

    #[test]
    fn test_search_and_expire() {
        let (mut store, ids) = store_with(&["alpha", "beta"]);
        let now = Instant::now();
        assert!(store.search("alp", now));
        assert!(store.highlights().is_node_highlighted(ids[0]));
        assert!(!store.highlights().is_node_highlighted(ids[1]));
        assert!(!store.search("", now));

        assert!(store.tick(now + Duration::from_millis(1500)));
        assert!(store.highlights().is_empty());
    }

    #[test]
    fn test_default_node_lands_on_drag_plane() {
        let mut store = Store::default();
        let id = store.add_default_node().unwrap();
        let node = store.graph().node(id).unwrap();
        assert_eq!(node.label, "Node 1");
        assert!(node.position[2].abs() < 1e-5);
        assert!(node.color.starts_with('#') && node.color.len() == 7);
    }

    #[test]
    fn test_history_limit_from_settings() {
        let settings = EditorSettings {
            history_limit: Some(3),
            ..EditorSettings::default()
        };
        let mut store = Store::new(settings);
        for label in ["A", "B", "C", "D"] {
            store.add_node(NodeSpec::labelled(label)).unwrap();
        }
        assert_eq!(store.history().len(), 3);
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.graph().node_count(), 2);
    }
}
