//! # bookshelf_core
//!
//! Index a shelf of JSON book records into a full-text index and search it by
//! ISBN, author, page count, description phrase, a combination of fields, or
//! free query-language text.
//!
//! ## Features
//!
//! - **Book Records**: Read and atomically write JSON book records on a shelf directory
//! - **Indexing**: Upsert single books or rebuild the whole index from a shelf
//! - **Searching**: Exact, fuzzy, phrase, range, boolean and free-text queries
//! - **Lightweight Results**: Ranked references that hydrate into full records on demand
//! - **Background Jobs**: Single-flight jobs per action, where a restart replaces the previous job
//! - **Robust Error Handling**: One error type with automatic conversions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookshelf_core::config::LibraryConfig;
//! use bookshelf_core::jobs::library::{Library, LibraryEvent};
//! use bookshelf_core::jobs::slot::JobOutcome;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut library = Library::open(LibraryConfig::from_env())?;
//!
//! // Rebuild the index in the background
//! library.start_index_all();
//!
//! if let LibraryEvent::Indexed(JobOutcome::Succeeded(count)) = library.next_event().await {
//!     println!("indexed {count} books");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: The `Book` record and the `BookReference` search result
//! - **[`shelf`]**: Shelf directories, the record store and reference hydration
//! - **[`search`]**: Field projection, query planning, paginated retrieval
//! - **[`jobs`]**: Background job slots and the `Library` facade
//! - **[`config`]**: Book and index locations
//! - **[`error`]**: Unified error handling throughout the library
//!
//! ## Searching
//!
//! Searches run synchronously through [`search::query::Query`], or as
//! background jobs through [`jobs::library::Library`]:
//!
//! ```rust,no_run
//! use bookshelf_core::config::LibraryConfig;
//! use bookshelf_core::jobs::library::Library;
//! use bookshelf_core::search::plan::FieldCriteria;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let library = Library::open(LibraryConfig::default())?;
//! let query = library.query();
//!
//! let book = query.find_book_by_isbn("978-9177423379")?;
//! let misspelled = query.find_books_by_author("Hem0ngwa1")?;
//! let references = query.find_references_by_fields(&FieldCriteria {
//!     author: "Hemingway".into(),
//!     min_pages: 150,
//!     max_pages: 300,
//!     ..Default::default()
//! })?;
//!
//! for reference in &references {
//!     let book = library.details(reference)?;
//!     println!("{} ({} pages)", book.title, book.pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`LibraryResult<T>`] which wraps the unified
//! [`LibraryError`] type. Record, shelf and engine errors convert
//! automatically, so `?` works throughout.

pub mod config;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod search;
pub mod shelf;

/// Re-exports the most commonly used types for convenience.
pub use error::{LibraryError, LibraryResult};
