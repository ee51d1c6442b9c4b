use crate::domain::Book;
use std::path::Path;
use tantivy::TantivyDocument;
use tantivy::schema::{FAST, Field, INDEXED, STORED, STRING, Schema, TEXT};

/// Names of the fields every indexed book document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Path,
    Isbn,
    Title,
    Author,
    Pages,
    Description,
}

impl FieldName {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::Path => "path",
            FieldName::Isbn => "isbn",
            FieldName::Title => "title",
            FieldName::Author => "author",
            FieldName::Pages => "pages",
            FieldName::Description => "description",
        }
    }
}

/// The engine schema for book documents, with a handle for every field.
///
/// | field         | policy                                   |
/// |---------------|------------------------------------------|
/// | `path`        | stored, exact match (hydration handle)   |
/// | `isbn`        | stored, exact match, unique per index    |
/// | `title`       | stored, tokenized                        |
/// | `author`      | stored, tokenized                        |
/// | `pages`       | numeric, range-queryable, not stored     |
/// | `description` | tokenized, not stored                    |
#[derive(Debug, Clone)]
pub struct BookSchema {
    schema: Schema,
    pub path: Field,
    pub isbn: Field,
    pub title: Field,
    pub author: Field,
    pub pages: Field,
    pub description: Field,
}

impl Default for BookSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl BookSchema {
    pub fn new() -> Self {
        let mut builder = Schema::builder();
        let path = builder.add_text_field(FieldName::Path.as_str(), STRING | STORED);
        let isbn = builder.add_text_field(FieldName::Isbn.as_str(), STRING | STORED);
        let title = builder.add_text_field(FieldName::Title.as_str(), TEXT | STORED);
        let author = builder.add_text_field(FieldName::Author.as_str(), TEXT | STORED);
        let pages = builder.add_i64_field(FieldName::Pages.as_str(), INDEXED | FAST);
        let description = builder.add_text_field(FieldName::Description.as_str(), TEXT);

        Self {
            schema: builder.build(),
            path,
            isbn,
            title,
            author,
            pages,
            description,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn field(&self, name: FieldName) -> Field {
        match name {
            FieldName::Path => self.path,
            FieldName::Isbn => self.isbn,
            FieldName::Title => self.title,
            FieldName::Author => self.author,
            FieldName::Pages => self.pages,
            FieldName::Description => self.description,
        }
    }

    /// Builds the engine document for one projected book.
    pub fn document(&self, fields: &SearchableFields) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.path, &fields.path);
        doc.add_text(self.isbn, &fields.isbn);
        doc.add_text(self.title, &fields.title);
        doc.add_text(self.author, &fields.author);
        doc.add_i64(self.pages, i64::from(fields.pages));
        doc.add_text(self.description, &fields.description);
        doc
    }
}

/// The searchable projection of a book, regenerated on every index operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableFields {
    pub path: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub pages: u32,
    pub description: String,
}

impl SearchableFields {
    pub fn project(path: &Path, book: &Book) -> Self {
        SearchableFields {
            path: path.to_string_lossy().into_owned(),
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            pages: book.pages,
            description: book.description.clone(),
        }
    }
}
