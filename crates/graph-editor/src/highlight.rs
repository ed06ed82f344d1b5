use scene_graph::{EdgeId, GraphStore, NodeId};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Transient search matches that expire on their own.
///
/// The clear is a deadline checked by [`Highlights::tick`] from the event
/// loop. A newer search replaces the deadline, which cancels the older
/// pending clear.
#[derive(Debug, Clone)]
pub struct Highlights {
    nodes: HashSet<NodeId>,
    edges: HashSet<EdgeId>,
    clear_at: Option<Instant>,
    duration: Duration,
}

impl Highlights {
    pub fn new(duration: Duration) -> Self {
        Self {
            nodes: HashSet::new(),
            edges: HashSet::new(),
            clear_at: None,
            duration,
        }
    }

    /// Highlight every node and edge whose label contains `query`.
    ///
    /// Matching is a case-sensitive substring test. An empty query does
    /// nothing and returns `false`.
    pub fn search(
        &mut self,
        graph: &GraphStore,
        query: &str,
        now: Instant,
    ) -> bool {
        if query.is_empty() {
            return false;
        }

        self.nodes = graph
            .nodes()
            .filter(|n| n.label.contains(query))
            .map(|n| n.id)
            .collect();
        self.edges = graph
            .edges()
            .filter(|e| e.label.contains(query))
            .map(|e| e.id)
            .collect();
        self.clear_at = Some(now + self.duration);
        true
    }

    /// Clear the highlight sets once their deadline has passed.
    ///
    /// Returns `true` when something was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.clear_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.clear_at = None;
    }

    pub fn is_node_highlighted(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn is_edge_highlighted(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }

    pub fn nodes(&self) -> &HashSet<NodeId> {
        &self.nodes
    }

    pub fn edges(&self) -> &HashSet<EdgeId> {
        &self.edges
    }

    pub fn clear_deadline(&self) -> Option<Instant> {
        self.clear_at
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_graph::{EdgePatch, NodeSpec};

    const DELAY: Duration = Duration::from_millis(1500);

    fn graph() -> GraphStore {
        let mut g = GraphStore::new();
        let alpha = g.add_node(NodeSpec::labelled("alpha")).unwrap();
        let beta = g.add_node(NodeSpec::labelled("Alphabet")).unwrap();
        let gamma = g.add_node(NodeSpec::labelled("gamma")).unwrap();
        let e1 = g.add_edge(alpha, beta).unwrap();
        g.update_edge(e1, &EdgePatch::label("alpha-link")).unwrap();
        let e2 = g.add_edge(beta, gamma).unwrap();
        g.update_edge(e2, &EdgePatch::label("other")).unwrap();
        g
    }

    #[test]
    fn test_empty_query_is_noop() {
        let g = graph();
        let now = Instant::now();
        let mut highlights = Highlights::new(DELAY);
        assert!(highlights.search(&g, "alpha", now));
        let before = highlights.clone();

        assert!(!highlights.search(&g, "", now + Duration::from_millis(10)));
        assert_eq!(highlights.nodes(), before.nodes());
        assert_eq!(highlights.clear_deadline(), before.clear_deadline());
    }

    #[test]
    fn test_matches_are_exact_case_sensitive_substrings() {
        let g = graph();
        let mut highlights = Highlights::new(DELAY);
        highlights.search(&g, "lpha", Instant::now());

        let expected: HashSet<NodeId> = g
            .nodes()
            .filter(|n| n.label.contains("lpha"))
            .map(|n| n.id)
            .collect();
        assert_eq!(highlights.nodes(), &expected);
        assert_eq!(highlights.nodes().len(), 2);
        assert_eq!(highlights.edges().len(), 1);

        highlights.search(&g, "alpha", Instant::now());
        assert_eq!(highlights.nodes().len(), 1, "Alphabet must not match");
    }

    #[test]
    fn test_highlights_clear_after_delay() {
        let g = graph();
        let start = Instant::now();
        let mut highlights = Highlights::new(DELAY);
        highlights.search(&g, "a", start);

        assert!(!highlights.tick(start + Duration::from_millis(1499)));
        assert!(!highlights.is_empty());
        assert!(highlights.tick(start + DELAY));
        assert!(highlights.is_empty());
        assert_eq!(highlights.clear_deadline(), None);
    }

    #[test]
    fn test_newer_search_supersedes_pending_clear() {
        let g = graph();
        let start = Instant::now();
        let mut highlights = Highlights::new(DELAY);
        highlights.search(&g, "alpha", start);

        let later = start + Duration::from_millis(1000);
        highlights.search(&g, "gamma", later);

        // The first search's deadline passes without wiping the newer one.
        assert!(!highlights.tick(start + DELAY));
        assert_eq!(highlights.nodes().len(), 1);
        assert!(highlights.tick(later + DELAY));
        assert!(highlights.is_empty());
    }
}
