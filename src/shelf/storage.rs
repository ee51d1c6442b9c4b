use crate::domain::Book;
use crate::error::LibraryError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("shelf not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid shelf: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directory holding one JSON file per book.
#[derive(Debug, Clone)]
pub struct Shelf {
    pub root: PathBuf,
}

impl Shelf {
    /// Opens an existing shelf directory.
    ///
    /// - Returns [`ShelfError::NotFound`] if the directory does not exist.
    /// - Returns [`ShelfError::InvalidInput`] if the path exists but is not a directory.
    pub fn open(root: &Path) -> Result<Self, ShelfError> {
        if !root.exists() {
            return Err(ShelfError::NotFound(root.to_path_buf()));
        }

        if !root.is_dir() {
            return Err(ShelfError::InvalidInput(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Ensures the shelf directory exists, creating it (and its parents) if missing.
    pub fn ensure_exists(root: &Path) -> Result<Self, ShelfError> {
        if !root.exists() {
            fs::create_dir_all(root)?;
        }

        Shelf::open(root)
    }

    /// Lists the book records on this shelf.
    ///
    /// Only regular, non-hidden `*.json` files directly under the root count as
    /// records. Paths are sorted by file name so a rebuild always visits them in
    /// the same order.
    pub fn record_paths(&self) -> Result<Vec<PathBuf>, ShelfError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_file() && is_record_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Writes `book` to `{root}/{isbn}.json`, replacing any previous record
    /// with the same ISBN.
    ///
    /// The record is written to a temporary file in the shelf directory and
    /// renamed into place, so readers never observe a half-written record.
    pub fn write_book(&self, book: &Book) -> Result<PathBuf, LibraryError> {
        let file_name = Self::record_file_name(&book.isbn)?;
        let path = self.root.join(file_name);
        let data = serde_json::to_vec_pretty(book)
            .map_err(|e| LibraryError::InvalidArgument(format!("unserializable book: {e}")))?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&data)?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(path)
    }

    /// Derives a record file name from an ISBN.
    ///
    /// Rejects blank ISBNs and ISBNs containing characters that are not valid
    /// in file names (`/`, `\`, `:`, `"`, `*`, `?`, `<`, `>`, `|`).
    fn record_file_name(isbn: &str) -> Result<String, ShelfError> {
        let trimmed = isbn.trim();

        if trimmed.is_empty() {
            return Err(ShelfError::InvalidInput("blank ISBN".into()));
        }

        if trimmed.contains(&['/', '\\', ':', '"', '*', '?', '<', '>', '|'][..]) {
            return Err(ShelfError::InvalidInput(format!(
                "ISBN not usable as a file name: {trimmed}"
            )));
        }

        Ok(format!("{trimmed}.json"))
    }
}

fn is_record_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_none_or(|name| name.starts_with('.'));

    !hidden && path.extension().and_then(|ext| ext.to_str()) == Some("json")
}
