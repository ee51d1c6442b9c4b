use crate::domain::{Book, BookReference};
use crate::error::{LibraryError, LibraryResult};
use crate::search::index::BookIndex;
use crate::search::plan::{BookQuery, FieldCriteria};
use crate::search::results::{collect_hits, into_books, into_references};
use crate::shelf::hydrate::Hydrator;
use crate::shelf::records::RecordStore;
use std::sync::Arc;
use tracing::debug;

/// Runs book searches against a [`BookIndex`].
///
/// Each search takes a fresh snapshot of the index, drains every page of the
/// result and releases the snapshot before returning.
#[derive(Clone)]
pub struct Query {
    index: BookIndex,
    store: Arc<dyn RecordStore>,
}

impl Query {
    pub fn new(index: &BookIndex, store: Arc<dyn RecordStore>) -> Self {
        Self {
            index: index.clone(),
            store,
        }
    }

    /// Looks up the single book with `isbn`.
    ///
    /// Fails with [`LibraryError::Consistency`] if more than one document
    /// carries the ISBN. An empty ISBN finds nothing.
    pub fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<Option<Book>> {
        let plan = BookQuery::by_isbn(isbn);
        let snapshot = self.index.snapshot()?;
        let hits = collect_hits(&snapshot, &*plan.compile(&snapshot)?)?;

        if hits.len() > 1 {
            return Err(LibraryError::Consistency(format!(
                "{} documents matched ISBN {isbn}",
                hits.len()
            )));
        }

        let hydrator = Hydrator::new(self.store.as_ref());
        Ok(into_books(&snapshot, &hits, &hydrator)?.pop())
    }

    /// Finds books whose author matches `author` within two edits.
    pub fn find_books_by_author(&self, author: &str) -> LibraryResult<Vec<Book>> {
        self.execute_book_query(&BookQuery::by_fuzzy_author(author))
    }

    /// Finds books with `min..=max` pages.
    pub fn find_books_by_pages_range(&self, min: u32, max: u32) -> LibraryResult<Vec<Book>> {
        self.execute_book_query(&BookQuery::by_pages_range(min, max))
    }

    pub fn find_references_by_author(&self, author: &str) -> LibraryResult<Vec<BookReference>> {
        self.execute_reference_query(&BookQuery::by_author(author))
    }

    /// Matches `description` as a phrase in which one word may be missing.
    pub fn find_references_by_description(
        &self,
        description: &str,
    ) -> LibraryResult<Vec<BookReference>> {
        self.execute_reference_query(&BookQuery::by_description(description))
    }

    pub fn find_references_by_fields(
        &self,
        criteria: &FieldCriteria,
    ) -> LibraryResult<Vec<BookReference>> {
        self.execute_reference_query(&BookQuery::by_fields(criteria)?)
    }

    /// Runs a query written in the engine's query language, e.g.
    /// `+author:hemingway -title:havet`.
    pub fn find_references_by_query(&self, text: &str) -> LibraryResult<Vec<BookReference>> {
        self.execute_reference_query(&BookQuery::by_query_text(text))
    }

    /// Number of books currently visible in the index.
    pub fn count_documents(&self) -> LibraryResult<u64> {
        Ok(self.index.snapshot()?.num_docs())
    }

    fn execute_book_query(&self, plan: &BookQuery) -> LibraryResult<Vec<Book>> {
        debug!(?plan, "executing book query");
        let snapshot = self.index.snapshot()?;
        let hits = collect_hits(&snapshot, &*plan.compile(&snapshot)?)?;
        let hydrator = Hydrator::new(self.store.as_ref());
        into_books(&snapshot, &hits, &hydrator)
    }

    fn execute_reference_query(&self, plan: &BookQuery) -> LibraryResult<Vec<BookReference>> {
        debug!(?plan, "executing reference query");
        let snapshot = self.index.snapshot()?;
        let hits = collect_hits(&snapshot, &*plan.compile(&snapshot)?)?;
        into_references(&snapshot, &hits)
    }
}
