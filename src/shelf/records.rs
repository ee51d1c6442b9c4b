use crate::domain::Book;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("book record not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read book record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed book record {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads individual book records from a content location.
pub trait RecordStore: Send + Sync {
    fn read_book(&self, path: &Path) -> Result<Book, ReadError>;
}

/// Reads books stored as JSON objects, one per file.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordStore;

impl RecordStore for JsonRecordStore {
    fn read_book(&self, path: &Path) -> Result<Book, ReadError> {
        let data = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ReadError::Missing(path.to_path_buf()),
            _ => ReadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        serde_json::from_slice(&data).map_err(|source| ReadError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}
