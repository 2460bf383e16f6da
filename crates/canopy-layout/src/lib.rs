#![forbid(unsafe_code)]

//! Spherical shell layout for large rooted trees.
//!
//! `canopy-layout` places every visible node of a [`canopy_tree::Tree`] in 3D. It is used by
//! `canopy` for the initial layout and for partial re-layout after expand/collapse.

pub mod error;
pub mod geometry;
pub mod options;
pub mod shells;
pub mod spherical;

pub use error::{Error, Result};
pub use options::LayoutOptions;
pub use spherical::{LayoutStats, layout, layout_subtree};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
