use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a generator call before it mutates the mesh
///
/// Per-face geometry problems (non-quad seeds, uneven sills) are not errors:
/// the face is skipped with a warning and the batch continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("host state: {0}")]
    HostState(String),

    #[error("kernel error: {0}")]
    Kernel(#[from] facadegen_kernel::Error),
}
