use crate::domain::{Book, BookReference};
use crate::shelf::records::{ReadError, RecordStore};

/// Expands [`BookReference`]s into full [`Book`]s through a [`RecordStore`].
pub struct Hydrator<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Hydrator<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Hydrator { store }
    }

    pub fn hydrate(&self, reference: &BookReference) -> Result<Book, ReadError> {
        self.store.read_book(reference.path())
    }

    /// Hydrates every reference in input order.
    ///
    /// Stops at the first unreadable record; no partial list is returned.
    pub fn hydrate_all(&self, references: &[BookReference]) -> Result<Vec<Book>, ReadError> {
        references.iter().map(|r| self.hydrate(r)).collect()
    }
}
