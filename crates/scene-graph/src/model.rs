use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------
// Identifiers
// ------------------------------------------------------------------

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge {}", self.0)
    }
}

// ------------------------------------------------------------------
// Bounded scalars
// ------------------------------------------------------------------

/// Bounds for a scalar field, shared by the model and the editor widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ScalarRange {
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp into range; NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const NODE_SIZE_RANGE: ScalarRange =
    ScalarRange::new(0.1, 5.0, 0.1, 1.0);
pub const TEXT_SIZE_RANGE: ScalarRange =
    ScalarRange::new(0.1, 3.0, 0.05, 0.5);
pub const EDGE_WIDTH_RANGE: ScalarRange =
    ScalarRange::new(1.0, 10.0, 0.5, 2.0);

pub const DEFAULT_NODE_COLOR: &str = "#1f77b4";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_EDGE_COLOR: &str = "#aaaaaa";

fn default_node_color() -> String {
    DEFAULT_NODE_COLOR.to_string()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_edge_color() -> String {
    DEFAULT_EDGE_COLOR.to_string()
}

fn default_node_size() -> f32 {
    NODE_SIZE_RANGE.default
}

fn default_text_size() -> f32 {
    TEXT_SIZE_RANGE.default
}

fn default_edge_width() -> f32 {
    EDGE_WIDTH_RANGE.default
}

// ------------------------------------------------------------------
// Node
// ------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Sphere,
    Box,
    Dodecahedron,
    Cylinder,
    Cone,
    Torus,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Sphere,
        Shape::Box,
        Shape::Dodecahedron,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Torus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Box => "box",
            Shape::Dodecahedron => "dodecahedron",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::Torus => "torus",
        }
    }
}

impl std::str::FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| format!("unknown shape '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub position: [f32; 3],
    #[serde(default = "default_node_color")]
    pub color: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub long_label: String,
    #[serde(default = "default_node_size")]
    pub size: f32,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_text_size")]
    pub text_size: f32,
    #[serde(default)]
    pub shape: Shape,
}

/// `position` if every coordinate is finite.
pub fn finite_position(position: [f32; 3]) -> Option<[f32; 3]> {
    position.iter().all(|c| c.is_finite()).then_some(position)
}

impl Node {
    /// Non-finite coordinates place the node at the origin.
    pub fn from_spec(id: NodeId, spec: NodeSpec) -> Self {
        Self {
            id,
            position: finite_position(spec.position).unwrap_or([0.0; 3]),
            color: spec.color,
            label: spec.label,
            long_label: spec.long_label,
            size: NODE_SIZE_RANGE.clamp(spec.size),
            text_color: spec.text_color,
            text_size: TEXT_SIZE_RANGE.clamp(spec.text_size),
            shape: spec.shape,
        }
    }

    /// Merge the set fields of `patch`; unset fields stay as they are.
    ///
    /// A position with a non-finite coordinate is ignored.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(position) = patch.position.and_then(finite_position) {
            self.position = position;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(long_label) = &patch.long_label {
            self.long_label = long_label.clone();
        }
        if let Some(size) = patch.size {
            self.size = NODE_SIZE_RANGE.clamp(size);
        }
        if let Some(text_color) = &patch.text_color {
            self.text_color = text_color.clone();
        }
        if let Some(text_size) = patch.text_size {
            self.text_size = TEXT_SIZE_RANGE.clamp(text_size);
        }
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
    }

    /// True when every numeric field can be written to a document.
    pub fn is_finite(&self) -> bool {
        finite_position(self.position).is_some()
            && self.size.is_finite()
            && self.text_size.is_finite()
    }
}

/// Everything needed to create a node except its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub position: [f32; 3],
    pub color: String,
    pub label: String,
    pub long_label: String,
    pub size: f32,
    pub text_color: String,
    pub text_size: f32,
    pub shape: Shape,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: default_node_color(),
            label: String::new(),
            long_label: String::new(),
            size: default_node_size(),
            text_color: default_text_color(),
            text_size: default_text_size(),
            shape: Shape::default(),
        }
    }
}

impl NodeSpec {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub position: Option<[f32; 3]>,
    pub color: Option<String>,
    pub label: Option<String>,
    pub long_label: Option<String>,
    pub size: Option<f32>,
    pub text_color: Option<String>,
    pub text_size: Option<f32>,
    pub shape: Option<Shape>,
}

impl NodePatch {
    pub fn position(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ------------------------------------------------------------------
// Edge
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default = "default_edge_color")]
    pub color: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub long_label: String,
    #[serde(default = "default_edge_width")]
    pub width: f32,
}

impl Edge {
    pub fn from_spec(
        id: EdgeId,
        from: NodeId,
        to: NodeId,
        spec: EdgeSpec,
    ) -> Self {
        Self {
            id,
            from,
            to,
            color: spec.color,
            label: spec.label,
            long_label: spec.long_label,
            width: EDGE_WIDTH_RANGE.clamp(spec.width),
        }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite()
    }

    pub fn apply(&mut self, patch: &EdgePatch) {
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(long_label) = &patch.long_label {
            self.long_label = long_label.clone();
        }
        if let Some(width) = patch.width {
            self.width = EDGE_WIDTH_RANGE.clamp(width);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub color: String,
    pub label: String,
    pub long_label: String,
    pub width: f32,
}

impl Default for EdgeSpec {
    fn default() -> Self {
        Self {
            color: default_edge_color(),
            label: String::new(),
            long_label: String::new(),
            width: default_edge_width(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub color: Option<String>,
    pub label: Option<String>,
    pub long_label: Option<String>,
    pub width: Option<f32>,
}

impl EdgePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ------------------------------------------------------------------
// Snapshot
// ------------------------------------------------------------------

/// Full copy of the node and edge collections at one point in time.
///
/// This is both the unit of undo/redo and the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
