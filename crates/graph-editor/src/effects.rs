use crate::store::Store;
use std::path::PathBuf;
use tracing::info;

/// Deferred effects that must run outside the main reducer (e.g., file IO)
#[derive(Debug, Clone)]
pub enum Effect {
    /// Save current graph to disk
    SaveToFile { path: PathBuf },
    /// Load a graph from disk
    LoadFromFile { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::SaveToFile { path } => match store.save_to_file(&path) {
            Ok(()) => info!(path = %path.display(), "saved graph"),
            Err(e) => {
                store.error_message =
                    Some(format!("Failed to save graph: {e}"));
            }
        },
        Effect::LoadFromFile { path } => {
            // The store records load failures itself.
            if store.load_from_file(&path).is_ok() {
                info!(path = %path.display(), "loaded graph");
            }
        }
    }
}
