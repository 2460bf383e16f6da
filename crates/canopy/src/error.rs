use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] canopy_tree::Error),

    #[error(transparent)]
    Layout(#[from] canopy_layout::Error),

    #[error("failed to load {}: {source}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("loader for {} stopped without a result", path.display())]
    LoaderAborted { path: PathBuf },

    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    #[error("node {id} is hidden; expand its ancestors first")]
    HiddenNode { id: String },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
