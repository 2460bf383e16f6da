#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node handle {index} does not belong to this tree")]
    UnknownNode { index: usize },

    #[error("node {id} is outside the subtree rooted at {root}")]
    OutsideView { id: String, root: String },
}

pub type Result<T> = std::result::Result<T, Error>;
