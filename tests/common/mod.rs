#![allow(dead_code)]

use bookshelf_core::domain::Book;
use bookshelf_core::search::index::BookIndex;
use bookshelf_core::search::indexer::BookIndexer;
use bookshelf_core::search::query::Query;
use bookshelf_core::shelf::records::JsonRecordStore;
use bookshelf_core::shelf::storage::Shelf;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const AUTHOR: &str = "Ernest Hemingway";

pub fn den_gamle_och_havet() -> Book {
    Book::new(
        "978-9177423379",
        "Den gamle och havet",
        AUTHOR,
        125,
        "Ernest Hemingways roman Den gamle och havet i nyöversättning och med efterord av Christian Ekvall. \
         Detta Hemingways kanske mest beundrade mästerverk handlar om den ärrade gamle fiskaren Santiago \
         som åker ut på havet i sin lilla båt 84 dagar i rad utan fiskelycka.",
    )
}

pub fn den_ororda_platsen() -> Book {
    Book::new(
        "978-9177424765",
        "Den orörda platsen",
        AUTHOR,
        177,
        "Den orörda platsen - en samlingsvolym med noveller av Ernest Hemingway. \
         Översättning och efterord av Christian Ekvall.",
    )
}

pub fn snon_pa_kilimanjaro() -> Book {
    Book::new(
        "978-9177424253",
        "Snön på Kilimanjaro",
        AUTHOR,
        270,
        "En volym med utvalda noveller av Ernest Hemingway som fått titeln Snön på Kilimanjaro - \
         nyöversättning och efterord av Christian Ekvall.",
    )
}

pub fn hemingway_books() -> Vec<Book> {
    vec![den_gamle_och_havet(), den_ororda_platsen(), snon_pa_kilimanjaro()]
}

/// A temporary library: a shelf under `book/` and an index under `index/`.
pub struct Fixture {
    pub tmp: TempDir,
    pub shelf: Shelf,
    pub index: BookIndex,
    pub indexer: BookIndexer,
    pub query: Query,
}

impl Fixture {
    pub fn empty() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let shelf = Shelf::ensure_exists(&tmp.path().join("book")).unwrap();
        let index = BookIndex::new(&tmp.path().join("index")).unwrap();
        let store = Arc::new(JsonRecordStore);

        Fixture {
            indexer: BookIndexer::new(&index, store.clone()),
            query: Query::new(&index, store),
            tmp,
            shelf,
            index,
        }
    }

    /// Writes `books` to the shelf and upserts each one.
    pub fn with_books(books: &[Book]) -> Fixture {
        let fixture = Fixture::empty();
        for book in books {
            let path = fixture.write(book);
            fixture.indexer.index_book(&path).unwrap();
        }
        fixture
    }

    pub fn write(&self, book: &Book) -> PathBuf {
        self.shelf.write_book(book).unwrap()
    }

    pub fn book_dir(&self) -> PathBuf {
        self.shelf.root.clone()
    }
}
