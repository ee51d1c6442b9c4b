use crate::config::LibraryConfig;
use crate::domain::{Book, BookReference};
use crate::error::LibraryResult;
use crate::jobs::slot::{JobOutcome, JobSlot, JobTicket};
use crate::search::index::BookIndex;
use crate::search::indexer::BookIndexer;
use crate::search::plan::FieldCriteria;
use crate::search::query::Query;
use crate::shelf::hydrate::Hydrator;
use crate::shelf::records::{JsonRecordStore, RecordStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The search form of the interactive client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub isbn: String,
    pub criteria: FieldCriteria,
}

#[derive(Debug)]
pub enum LibraryEvent {
    /// An index job ended; on success carries the number of books indexed.
    Indexed(JobOutcome<usize>),
    BookFound(JobOutcome<Option<Book>>),
    ReferencesFound(JobOutcome<Vec<BookReference>>),
}

/// Caller-side entry point: owns the index, the record store and one job slot
/// per action.
///
/// Methods that start jobs return immediately; results arrive through
/// [`Library::next_event`], which must be polled from the caller's own task.
pub struct Library {
    config: LibraryConfig,
    store: Arc<dyn RecordStore>,
    indexer: BookIndexer,
    query: Query,
    index_job: JobSlot<usize>,
    book_job: JobSlot<Option<Book>>,
    references_job: JobSlot<Vec<BookReference>>,
}

impl Library {
    /// Opens a library reading JSON records.
    pub fn open(config: LibraryConfig) -> LibraryResult<Self> {
        Self::with_store(config, Arc::new(JsonRecordStore))
    }

    pub fn with_store(config: LibraryConfig, store: Arc<dyn RecordStore>) -> LibraryResult<Self> {
        let index = BookIndex::new(&config.index_dir)?;

        Ok(Library {
            indexer: BookIndexer::new(&index, store.clone()),
            query: Query::new(&index, store.clone()),
            store,
            config,
            index_job: JobSlot::new("index"),
            book_job: JobSlot::new("find-book"),
            references_job: JobSlot::new("find-references"),
        })
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Synchronous access to the query service.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Rebuilds the index from the configured book directory.
    pub fn start_index_all(&mut self) -> JobTicket {
        let indexer = self.indexer.clone();
        let book_dir = self.config.book_dir.clone();
        self.index_job
            .restart(move || indexer.index_all_books(&book_dir))
    }

    /// Upserts the single record at `path`. Shares the index slot with
    /// [`Library::start_index_all`].
    pub fn start_index_book(&mut self, path: &Path) -> JobTicket {
        let indexer = self.indexer.clone();
        let path: PathBuf = path.to_path_buf();
        self.index_job.restart(move || {
            indexer.index_book(&path)?;
            Ok(1)
        })
    }

    pub fn start_find_book(&mut self, isbn: &str) -> JobTicket {
        let query = self.query.clone();
        let isbn = isbn.trim().to_owned();
        self.book_job
            .restart(move || query.find_book_by_isbn(&isbn))
    }

    pub fn start_find_references(&mut self, criteria: FieldCriteria) -> JobTicket {
        let query = self.query.clone();
        self.references_job
            .restart(move || query.find_references_by_fields(&criteria))
    }

    /// Runs free query-language text. Shares the references slot with
    /// [`Library::start_find_references`].
    pub fn start_query(&mut self, text: &str) -> JobTicket {
        let query = self.query.clone();
        let text = text.to_owned();
        self.references_job
            .restart(move || query.find_references_by_query(&text))
    }

    /// Looks a book up by ISBN when one is given, otherwise searches by the
    /// remaining fields.
    pub fn search(&mut self, form: &SearchForm) -> JobTicket {
        if form.isbn.trim().is_empty() {
            self.start_find_references(form.criteria.clone())
        } else {
            self.start_find_book(&form.isbn)
        }
    }

    /// Loads the full record behind a search result.
    pub fn details(&self, reference: &BookReference) -> LibraryResult<Book> {
        Ok(Hydrator::new(self.store.as_ref()).hydrate(reference)?)
    }

    /// `true` while any job is running.
    pub fn is_busy(&self) -> bool {
        self.index_job.is_running()
            || self.book_job.is_running()
            || self.references_job.is_running()
    }

    pub fn index_job(&self) -> &JobSlot<usize> {
        &self.index_job
    }

    pub fn book_job(&self) -> &JobSlot<Option<Book>> {
        &self.book_job
    }

    pub fn references_job(&self) -> &JobSlot<Vec<BookReference>> {
        &self.references_job
    }

    /// Cancels every running job. Each cancelled slot reports
    /// [`JobOutcome::Cancelled`] through [`Library::next_event`].
    pub fn cancel_all(&mut self) {
        self.index_job.cancel();
        self.book_job.cancel();
        self.references_job.cancel();
    }

    /// Waits for the next job of any action to finish.
    pub async fn next_event(&mut self) -> LibraryEvent {
        tokio::select! {
            outcome = self.index_job.next_outcome() => LibraryEvent::Indexed(outcome),
            outcome = self.book_job.next_outcome() => LibraryEvent::BookFound(outcome),
            outcome = self.references_job.next_outcome() => LibraryEvent::ReferencesFound(outcome),
        }
    }
}
