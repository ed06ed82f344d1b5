pub mod actions;
pub mod camera;
pub mod cli;
pub mod drag;
pub mod effects;
pub mod highlight;
pub mod interaction;
pub mod settings;
pub mod state;
pub mod store;

pub use actions::Action;
pub use camera::{PerspectiveCamera, Plane, Ray, RayCaster};
pub use drag::{DragOutcome, DragSession, ProjectionError};
pub use effects::Effect;
pub use highlight::Highlights;
pub use interaction::{InteractionMode, Intent, PointerTarget, Session};
pub use settings::{EditorSettings, SettingsError};
pub use state::State;
pub use store::Store;
