use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tag index and the sidecar codec.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Folder not found: {0:?}")]
    FolderNotFound(PathBuf),

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Image is not part of the loaded folder: {0}")]
    UnknownImage(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan folder: {0}")]
    Walk(#[from] walkdir::Error),
}

impl TaggerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaggerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;
