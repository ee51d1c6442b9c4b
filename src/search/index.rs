use crate::error::LibraryError;
use crate::search::fields::{BookSchema, FieldName, SearchableFields};
use crate::search::results::ScoredDoc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::directory::error::OpenDirectoryError;
use tantivy::query::{Query as EngineQuery, QueryParser};
use tantivy::schema::{Field, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};
use thiserror::Error;
use tracing::{debug, warn};

/// Memory budget handed to each engine writer.
const WRITER_MEMORY_BYTES: usize = 50_000_000;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("search engine failure: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("cannot open index directory: {0}")]
    Directory(#[from] OpenDirectoryError),

    #[error("index document is missing stored field `{0}`")]
    MissingField(&'static str),
}

/// Handle on the on-disk book index.
///
/// No engine resources are held between calls: every write opens a writer and
/// commits before returning, and every read works on a [`Snapshot`] that is
/// released when dropped. Clones share the writer lock, so writes issued
/// through any clone are serialized.
#[derive(Debug, Clone)]
pub struct BookIndex {
    path: PathBuf,
    schema: BookSchema,
    writer_lock: Arc<Mutex<()>>,
}

/// Stored fields of one indexed book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBook {
    pub path: PathBuf,
    pub isbn: String,
    pub title: String,
    pub author: String,
}

impl BookIndex {
    /// Opens the index at `index_dir`, creating the directory and an empty
    /// index if neither exists yet.
    pub fn new(index_dir: &Path) -> Result<Self, LibraryError> {
        fs::create_dir_all(index_dir)?;

        let index = BookIndex {
            path: index_dir.to_path_buf(),
            schema: BookSchema::new(),
            writer_lock: Arc::new(Mutex::new(())),
        };
        index.open_engine()?;

        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &BookSchema {
        &self.schema
    }

    /// Inserts `fields`, replacing any document with the same ISBN.
    pub fn upsert(&self, fields: &SearchableFields) -> Result<(), EngineError> {
        let _guard = self.lock_writer();
        let mut writer = self.open_writer()?;

        writer.delete_term(self.isbn_term(&fields.isbn));
        writer.add_document(self.schema.document(fields))?;
        writer.commit()?;

        debug!(isbn = %fields.isbn, "upserted book document");
        Ok(())
    }

    /// Replaces the whole index content with `documents`.
    ///
    /// Nothing becomes visible to readers until the final commit. If any write
    /// fails the writer is rolled back and the previously committed index is
    /// left untouched. Should the same ISBN occur more than once, the last
    /// document wins.
    pub fn rebuild(&self, documents: &[SearchableFields]) -> Result<(), EngineError> {
        let _guard = self.lock_writer();
        let mut writer = self.open_writer()?;

        if let Err(e) = self.replace_all(&mut writer, documents) {
            if let Err(rollback) = writer.rollback() {
                warn!(error = %rollback, "failed to roll back index rebuild");
            }
            return Err(e);
        }

        debug!(documents = documents.len(), "rebuilt book index");
        Ok(())
    }

    /// Acquires a point-in-time read view of the committed index.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let index = self.open_engine()?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Snapshot {
            searcher: reader.searcher(),
            index,
            schema: self.schema.clone(),
        })
    }

    fn replace_all(
        &self,
        writer: &mut IndexWriter,
        documents: &[SearchableFields],
    ) -> Result<(), EngineError> {
        writer.delete_all_documents()?;
        for fields in documents {
            writer.delete_term(self.isbn_term(&fields.isbn));
            writer.add_document(self.schema.document(fields))?;
        }
        writer.commit()?;
        Ok(())
    }

    fn open_engine(&self) -> Result<Index, EngineError> {
        let dir = MmapDirectory::open(&self.path)?;
        Ok(Index::open_or_create(dir, self.schema.schema().clone())?)
    }

    fn open_writer(&self) -> Result<IndexWriter, EngineError> {
        let index = self.open_engine()?;
        Ok(index.writer(WRITER_MEMORY_BYTES)?)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn isbn_term(&self, isbn: &str) -> Term {
        Term::from_field_text(self.schema.isbn, isbn)
    }
}

/// A read-only view of the index as of the moment it was taken.
///
/// Pages fetched from the same snapshot are mutually consistent, even while
/// another job rebuilds the index.
pub struct Snapshot {
    index: Index,
    searcher: Searcher,
    schema: BookSchema,
}

impl Snapshot {
    pub fn schema(&self) -> &BookSchema {
        &self.schema
    }

    pub fn num_docs(&self) -> u64 {
        self.searcher.num_docs()
    }

    /// A free-text parser searching `description` unless a field is named.
    pub fn query_parser(&self) -> QueryParser {
        QueryParser::for_index(&self.index, vec![self.schema.description])
    }

    /// Returns up to `limit` hits ranked directly after `after`, by descending
    /// score. `None` starts from the top.
    pub fn page_after(
        &self,
        query: &dyn EngineQuery,
        after: Option<&ScoredDoc>,
        limit: usize,
    ) -> Result<Vec<ScoredDoc>, EngineError> {
        let offset = after.map_or(0, |hit| hit.rank + 1);
        let collector = TopDocs::with_limit(limit.max(1)).and_offset(offset);
        let top_docs = self.searcher.search(query, &collector)?;

        Ok(top_docs
            .into_iter()
            .enumerate()
            .map(|(i, (score, address))| ScoredDoc {
                score,
                address,
                rank: offset + i,
            })
            .collect())
    }

    /// Loads the stored fields of a hit.
    pub fn stored(&self, hit: &ScoredDoc) -> Result<StoredBook, EngineError> {
        let doc: TantivyDocument = self.searcher.doc(hit.address)?;

        Ok(StoredBook {
            path: PathBuf::from(stored_text(&doc, self.schema.path, FieldName::Path)?),
            isbn: stored_text(&doc, self.schema.isbn, FieldName::Isbn)?,
            title: stored_text(&doc, self.schema.title, FieldName::Title)?,
            author: stored_text(&doc, self.schema.author, FieldName::Author)?,
        })
    }
}

fn stored_text(doc: &TantivyDocument, field: Field, name: FieldName) -> Result<String, EngineError> {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or(EngineError::MissingField(name.as_str()))
}
