//! Book indexing and search.
//!
//! Books are projected into [`fields::SearchableFields`] and written to a
//! tantivy index by the [`indexer::BookIndexer`]. Searches are planned as
//! [`plan::BookQuery`] values, executed by [`query::Query`] and drained page
//! by page by the functions in [`results`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use bookshelf_core::search::{index::BookIndex, indexer::BookIndexer, query::Query};
//! use bookshelf_core::shelf::records::JsonRecordStore;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = BookIndex::new(Path::new("data/index"))?;
//! let store = Arc::new(JsonRecordStore);
//!
//! BookIndexer::new(&index, store.clone()).index_all_books(Path::new("data/book"))?;
//!
//! let query = Query::new(&index, store);
//! let books = query.find_books_by_author("Hemingway")?;
//! let references = query.find_references_by_query("+author:hemingway AND noveller")?;
//! # Ok(())
//! # }
//! ```

pub mod fields;
pub mod index;
pub mod indexer;
pub mod plan;
pub mod query;
pub mod results;
