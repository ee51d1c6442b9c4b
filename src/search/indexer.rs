use crate::error::LibraryResult;
use crate::search::fields::SearchableFields;
use crate::search::index::BookIndex;
use crate::shelf::records::RecordStore;
use crate::shelf::storage::Shelf;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Projects book records into the index.
#[derive(Clone)]
pub struct BookIndexer {
    index: BookIndex,
    store: Arc<dyn RecordStore>,
}

impl BookIndexer {
    pub fn new(index: &BookIndex, store: Arc<dyn RecordStore>) -> Self {
        Self {
            index: index.clone(),
            store,
        }
    }

    /// Reads the record at `path` and upserts it, keyed by ISBN.
    pub fn index_book(&self, path: &Path) -> LibraryResult<()> {
        let book = self.store.read_book(path)?;
        self.index.upsert(&SearchableFields::project(path, &book))?;

        info!(isbn = %book.isbn, path = %path.display(), "indexed book");
        Ok(())
    }

    /// Rebuilds the index from every record on the shelf at `book_dir`.
    ///
    /// All records are read before the index is touched: an unreadable record
    /// aborts the rebuild and leaves the previous index in place. Returns the
    /// number of records indexed.
    pub fn index_all_books(&self, book_dir: &Path) -> LibraryResult<usize> {
        let shelf = Shelf::open(book_dir)?;
        let paths = shelf.record_paths()?;

        let mut documents = Vec::with_capacity(paths.len());
        let mut seen = HashSet::new();
        for path in &paths {
            let book = self.store.read_book(path)?;
            if !seen.insert(book.isbn.clone()) {
                warn!(isbn = %book.isbn, path = %path.display(), "duplicate ISBN on shelf, last record wins");
            }
            documents.push(SearchableFields::project(path, &book));
        }

        self.index.rebuild(&documents)?;

        info!(books = documents.len(), shelf = %book_dir.display(), "rebuilt index");
        Ok(documents.len())
    }
}
