use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Read(#[from] crate::shelf::records::ReadError),

    #[error(transparent)]
    Shelf(#[from] crate::shelf::storage::ShelfError),

    #[error(transparent)]
    Engine(#[from] crate::search::index::EngineError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index consistency violated: {0}")]
    Consistency(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("background job failed: {0}")]
    Job(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
