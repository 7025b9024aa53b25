use thiserror::Error;

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised on structural misuse of the mesh kernel
#[derive(Error, Debug)]
pub enum Error {
    #[error("dead element: {0}")]
    DeadElement(String),

    #[error("invalid face loop: {0}")]
    InvalidLoop(String),

    #[error("edge is not a wire edge: {0}")]
    EdgeNotWire(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
