use scene_graph::{
    EDGE_WIDTH_RANGE, EdgeSpec, NODE_SIZE_RANGE, NodeSpec, Shape,
    TEXT_SIZE_RANGE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Editor-wide configuration, loadable from a JSON file.
///
/// Every field has a default, so a settings file only needs to mention
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// How long search matches stay highlighted.
    pub highlight_duration_ms: u64,
    /// Maximum number of undo snapshots; `None` keeps everything.
    pub history_limit: Option<usize>,
    pub drag_plane: DragPlaneSettings,
    pub nodes: NodeDefaults,
    pub edges: EdgeDefaults,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            highlight_duration_ms: 1500,
            history_limit: None,
            drag_plane: DragPlaneSettings::default(),
            nodes: NodeDefaults::default(),
            edges: EdgeDefaults::default(),
        }
    }
}

impl EditorSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject numbers that parsed but cannot be used, such as a
    /// `spawn_extent` too large for `f32`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.nodes.spawn_extent.is_finite() {
            return Err(SettingsError::Invalid("nodes.spawn_extent"));
        }
        let plane = &self.drag_plane;
        if !plane.distance.is_finite()
            || !plane.normal.iter().all(|c| c.is_finite())
        {
            return Err(SettingsError::Invalid("drag_plane"));
        }
        Ok(())
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}

/// Reference plane for dragging: points `p` with `normal · p == distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPlaneSettings {
    pub normal: [f32; 3],
    pub distance: f32,
}

impl Default for DragPlaneSettings {
    fn default() -> Self {
        Self {
            normal: [0.0, 0.0, 1.0],
            distance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    pub label_prefix: String,
    pub size: f32,
    pub text_color: String,
    pub text_size: f32,
    pub shape: Shape,
    /// New nodes without an explicit position are scattered within
    /// `[-spawn_extent, spawn_extent]` on each axis of the drag plane.
    pub spawn_extent: f32,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            label_prefix: "Node".to_string(),
            size: NODE_SIZE_RANGE.default,
            text_color: "#ffffff".to_string(),
            text_size: TEXT_SIZE_RANGE.default,
            shape: Shape::Sphere,
            spawn_extent: 5.0,
        }
    }
}

impl NodeDefaults {
    /// Spec for the `ordinal`-th node; position and colour are filled in by
    /// the caller.
    pub fn spec(&self, ordinal: usize) -> NodeSpec {
        NodeSpec {
            label: format!("{} {}", self.label_prefix, ordinal),
            size: self.size,
            text_color: self.text_color.clone(),
            text_size: self.text_size,
            shape: self.shape,
            ..NodeSpec::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDefaults {
    pub color: String,
    pub width: f32,
}

impl Default for EdgeDefaults {
    fn default() -> Self {
        Self {
            color: "#aaaaaa".to_string(),
            width: EDGE_WIDTH_RANGE.default,
        }
    }
}

impl EdgeDefaults {
    pub fn spec(&self) -> EdgeSpec {
        EdgeSpec {
            color: self.color.clone(),
            width: self.width,
            ..EdgeSpec::default()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings field {0} must be a finite number")]
    Invalid(&'static str),
}
