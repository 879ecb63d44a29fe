//! Durable client storage for the Echo client.
//!
//! Two slots survive process restarts: the bearer credential and a JSON
//! snapshot of the signed-in identity. Backends:
//! - **File**: a JSON object on disk, rewritten atomically on every mutation
//! - **Memory**: process-local, for tests and embedding

mod file;
mod keys;
mod memory;
mod mirror;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use mirror::SessionMirror;
pub use traits::ClientStorage;

use std::path::Path;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open the default file-backed storage at `path`.
pub fn create_storage(path: &Path) -> StorageResult<Box<dyn ClientStorage>> {
    let storage = FileStorage::open(path)?;
    Ok(Box::new(storage))
}

/// Create a SessionMirror backed by the file at `path`.
pub fn create_session_mirror(path: &Path) -> StorageResult<SessionMirror> {
    let storage = create_storage(path)?;
    Ok(SessionMirror::new(storage))
}
