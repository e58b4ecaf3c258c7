//! Model boundary: reads glTF documents far enough to size and place them.
//!
//! Only the scene graph and accessor bounds are read. Vertex buffers are
//! never touched; a renderer that needs them loads the file itself.
//!
//! # Failure policy
//! A prop that fails to load is skipped with a warning. The game runs
//! without it.

mod model;
mod prop;

pub use model::{Document, load_document, parse_document};
pub use prop::{FitMode, Prop, PropLoader};

/// Errors from model loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glTF error: {0}")]
    Gltf(String),
    #[error("model has no geometry")]
    NoGeometry,
}
