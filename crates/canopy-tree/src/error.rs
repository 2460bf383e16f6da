#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
