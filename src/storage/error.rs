//! Errors raised by snapshot stores.

use thiserror::Error;

/// Errors surfaced by snapshot stores.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
