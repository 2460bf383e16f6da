//! File loading.
//!
//! Parsing a large file can take a while, so [`load_tree`] runs it on a dedicated thread and
//! resolves once the tree is fully built. It is executor-agnostic: any `block_on` or async
//! runtime can drive it. The returned tree is only handed over after construction completes.

use crate::error::{Error, Result};
use canopy_tree::Tree;
use std::path::{Path, PathBuf};

pub fn load_tree_sync(path: impl AsRef<Path>) -> Result<Tree> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::LoadFailure {
        path: path.to_path_buf(),
        source,
    })?;
    let mut tree = Tree::parse(&text)?;
    if let Some(name) = path.file_name() {
        tree.set_name(name.to_string_lossy());
    }
    tracing::debug!(path = %path.display(), nodes = tree.len(), "loaded tree");
    Ok(tree)
}

pub async fn load_tree(path: impl Into<PathBuf>) -> Result<Tree> {
    let path = path.into();
    let (tx, rx) = futures::channel::oneshot::channel();

    let worker_path = path.clone();
    std::thread::Builder::new()
        .name("canopy-loader".to_string())
        .spawn(move || {
            // The receiver may already be gone if the caller dropped the future.
            let _ = tx.send(load_tree_sync(&worker_path));
        })
        .map_err(|source| Error::LoadFailure {
            path: path.clone(),
            source,
        })?;

    match rx.await {
        Ok(result) => result,
        Err(_canceled) => Err(Error::LoaderAborted { path }),
    }
}
