/// Crate-wide result type for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed transport errors shared by sink implementations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing to the underlying stream failed.
    #[error("transport write failed: {0}")]
    Io(#[from] std::io::Error),
}
