use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the index and its on-disk store.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index file does not exist. Callers use this to bootstrap a fresh database.
    #[error("index file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("index data is corrupt: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no document ids left to assign")]
    IdsExhausted,

    #[error("invalid document id: {0:?}")]
    InvalidDocId(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, IndexError::Corrupt(_))
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Corrupt(err.to_string())
    }
}
