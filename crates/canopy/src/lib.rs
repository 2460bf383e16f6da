#![forbid(unsafe_code)]

//! Headless core of a 3D tree viewer.
//!
//! A tree is read from adjacency-list text: one line per parent, tab separated (space separated
//! when a line has no tab), the parent id first and its children after it. A child token `0`
//! ends the line early and the first line's first token names the root. For example:
//!
//! ```text
//! A	B	C
//! B	D
//! ```
//!
//! [`Viewer`] owns the tree, shows and hides subtrees, lays visible nodes out on spherical
//! shells (see `canopy-layout`) and drives an [`OrbitCamera`]. Renderers read positions,
//! visibility and the camera pose, either directly or through a [`SceneSnapshot`].
//!
//! Design goals:
//! - deterministic layout (the same tree and options always give the same positions)
//! - runtime-agnostic async loading (no specific executor required)

pub mod camera;
pub mod config;
pub mod error;
pub mod loader;
pub mod snapshot;
pub mod viewer;

pub use camera::{CameraOptions, OrbitCamera};
pub use canopy_layout::{LayoutOptions, LayoutStats};
pub use canopy_tree::{Node, NodeId, Tree};
pub use config::CanopyConfig;
pub use error::{Error, Result};
pub use loader::{load_tree, load_tree_sync};
pub use snapshot::{CameraPose, EdgeView, NodeView, SceneSnapshot};
pub use viewer::Viewer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads a tree file off the calling thread and opens a viewer on it.
pub async fn open(path: impl Into<std::path::PathBuf>, config: &CanopyConfig) -> Result<Viewer> {
    let tree = load_tree(path).await?;
    Viewer::new(tree, config)
}

/// Parses `text` and opens a viewer on it.
pub fn open_str(text: &str, config: &CanopyConfig) -> Result<Viewer> {
    let tree = Tree::parse(text)?;
    Viewer::new(tree, config)
}
