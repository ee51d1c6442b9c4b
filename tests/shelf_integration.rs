mod common;

use bookshelf_core::domain::BookReference;
use bookshelf_core::shelf::hydrate::Hydrator;
use bookshelf_core::shelf::records::{JsonRecordStore, ReadError, RecordStore};
use bookshelf_core::shelf::storage::{Shelf, ShelfError};
use bookshelf_core::LibraryError;
use common::{den_gamle_och_havet, hemingway_books};
use std::fs;
use tempfile::TempDir;

#[test]
fn ensure_exists_should_create_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("nested").join("book");

    let shelf = Shelf::ensure_exists(&root).expect("Should be able to create shelf");

    assert!(shelf.root.exists());
    assert!(shelf.root.is_dir());
}

#[test]
fn opening_nonexistent_shelf_should_fail() {
    let tmp = TempDir::new().unwrap();
    let result = Shelf::open(&tmp.path().join("missing"));

    assert!(matches!(result, Err(ShelfError::NotFound(_))));
}

#[test]
fn opening_a_file_as_shelf_should_fail() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("not_a_dir");
    fs::write(&file, "x").unwrap();

    assert!(matches!(Shelf::open(&file), Err(ShelfError::InvalidInput(_))));
}

#[test]
fn written_book_reads_back_equal() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();
    let book = den_gamle_och_havet();

    let path = shelf.write_book(&book).unwrap();

    assert_eq!(path, tmp.path().join("978-9177423379.json"));
    assert_eq!(JsonRecordStore.read_book(&path).unwrap(), book);
}

#[test]
fn rewriting_a_book_replaces_the_record() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();
    let mut book = den_gamle_och_havet();
    shelf.write_book(&book).unwrap();

    book.pages = 126;
    let path = shelf.write_book(&book).unwrap();

    assert_eq!(JsonRecordStore.read_book(&path).unwrap().pages, 126);
    assert_eq!(shelf.record_paths().unwrap().len(), 1);
}

#[test]
fn unusable_isbn_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();

    let mut book = den_gamle_och_havet();
    book.isbn = "  ".into();
    assert!(matches!(
        shelf.write_book(&book),
        Err(LibraryError::Shelf(ShelfError::InvalidInput(_)))
    ));

    book.isbn = "../escape".into();
    assert!(shelf.write_book(&book).is_err());
}

#[test]
fn record_paths_skip_hidden_and_foreign_files() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();
    for book in hemingway_books() {
        shelf.write_book(&book).unwrap();
    }
    fs::write(tmp.path().join(".hidden.json"), "{}").unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a book").unwrap();
    fs::create_dir(tmp.path().join("sub.json")).unwrap();

    let paths = shelf.record_paths().unwrap();

    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "978-9177423379.json",
            "978-9177424253.json",
            "978-9177424765.json"
        ]
    );
}

#[test]
fn missing_record_is_reported_as_missing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("gone.json");

    let err = JsonRecordStore.read_book(&path).unwrap_err();

    assert!(matches!(err, ReadError::Missing(p) if p == path));
}

#[test]
fn malformed_record_is_reported_as_malformed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.json");
    fs::write(&path, r#"{"isbn": "1", "title": "No pages"}"#).unwrap();

    let err = JsonRecordStore.read_book(&path).unwrap_err();

    assert!(matches!(err, ReadError::Malformed { .. }));
}

#[test]
fn hydrate_all_preserves_reference_order() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();
    let books = hemingway_books();
    let references: Vec<_> = books
        .iter()
        .rev()
        .map(|book| BookReference {
            author: book.author.clone(),
            title: book.title.clone(),
            path: shelf.write_book(book).unwrap(),
            score: 1.0,
        })
        .collect();

    let hydrated = Hydrator::new(&JsonRecordStore)
        .hydrate_all(&references)
        .unwrap();

    let expected: Vec<_> = books.into_iter().rev().collect();
    assert_eq!(hydrated, expected);
}

#[test]
fn hydrate_all_fails_on_first_unreadable_record() {
    let tmp = TempDir::new().unwrap();
    let shelf = Shelf::ensure_exists(tmp.path()).unwrap();
    let book = den_gamle_och_havet();
    let good = BookReference {
        author: book.author.clone(),
        title: book.title.clone(),
        path: shelf.write_book(&book).unwrap(),
        score: 1.0,
    };
    let gone = BookReference {
        path: tmp.path().join("gone.json"),
        ..good.clone()
    };

    let result = Hydrator::new(&JsonRecordStore).hydrate_all(&[good, gone]);

    assert!(matches!(result, Err(ReadError::Missing(_))));
}
