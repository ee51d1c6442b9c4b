use std::env;
use std::path::{Path, PathBuf};

pub const BOOK_DIR_VAR: &str = "BOOKSHELF_BOOK_DIR";
pub const INDEX_DIR_VAR: &str = "BOOKSHELF_INDEX_DIR";

/// Locations of the book collection and of the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub book_dir: PathBuf,
    pub index_dir: PathBuf,
}

impl Default for LibraryConfig {
    /// `data/book` and `data/index`, relative to the working directory.
    fn default() -> Self {
        Self::under(Path::new("data"))
    }
}

impl LibraryConfig {
    /// Lays out `book/` and `index/` below `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            book_dir: root.join("book"),
            index_dir: root.join("index"),
        }
    }

    /// Resolves `<data dir>/bookshelf` for the current user.
    ///
    /// Returns `None` when the platform has no notion of a user data directory.
    pub fn in_user_data_dir() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::under(&dir.join("bookshelf")))
    }

    /// Starts from [`LibraryConfig::default`] and applies `BOOKSHELF_BOOK_DIR`
    /// and `BOOKSHELF_INDEX_DIR` when they are set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_overrides(env::var(BOOK_DIR_VAR).ok(), env::var(INDEX_DIR_VAR).ok())
    }

    fn with_overrides(mut self, book_dir: Option<String>, index_dir: Option<String>) -> Self {
        if let Some(dir) = book_dir.filter(|d| !d.trim().is_empty()) {
            self.book_dir = PathBuf::from(dir);
        }
        if let Some(dir) = index_dir.filter(|d| !d.trim().is_empty()) {
            self.index_dir = PathBuf::from(dir);
        }
        self
    }
}
