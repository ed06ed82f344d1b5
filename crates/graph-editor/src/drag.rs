use glam::Vec3;
use scene_graph::NodeId;

use crate::camera::{Plane, Ray};

/// One drag gesture on one node, from pointer-down to pointer-up.
///
/// The grab offset between the plane hit and the node is fixed when the
/// session starts, so the node keeps its position relative to the cursor
/// instead of snapping onto it. A session must be ended with
/// [`DragSession::finish`]; the editor store holds at most one and tears it
/// down on pointer-up or mode change.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    node: NodeId,
    plane: Plane,
    offset: Vec3,
    start: Vec3,
    last: Vec3,
    samples: usize,
}

/// Summary of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub node: NodeId,
    pub start: Vec3,
    pub last: Vec3,
    pub samples: usize,
}

impl DragOutcome {
    pub fn moved(&self) -> bool {
        self.start != self.last
    }
}

impl DragSession {
    pub fn begin(
        node: NodeId,
        node_position: Vec3,
        grab: &Ray,
        plane: Plane,
    ) -> Result<Self, ProjectionError> {
        let hit = grab
            .intersect_plane(&plane)
            .ok_or(ProjectionError::Degenerate)?;
        Ok(Self {
            node,
            plane,
            offset: hit - node_position,
            start: node_position,
            last: node_position,
            samples: 0,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn last_position(&self) -> Vec3 {
        self.last
    }

    /// New node position for a pointer sample.
    ///
    /// A ray that misses the plane leaves the session untouched.
    pub fn sample(&mut self, ray: &Ray) -> Result<Vec3, ProjectionError> {
        let hit = ray
            .intersect_plane(&self.plane)
            .ok_or(ProjectionError::Degenerate)?;
        self.last = hit - self.offset;
        self.samples += 1;
        Ok(self.last)
    }

    pub fn finish(self) -> DragOutcome {
        DragOutcome {
            node: self.node,
            start: self.start,
            last: self.last,
            samples: self.samples,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("pointer ray does not intersect the drag plane")]
    Degenerate,
}
