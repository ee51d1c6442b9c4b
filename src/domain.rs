use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A book record as stored on disk.
///
/// The JSON field names (`isbn`, `title`, `author`, `pages`, `description`)
/// are the persisted format and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub pages: u32,
    pub description: String,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        pages: u32,
        description: impl Into<String>,
    ) -> Self {
        Book {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            pages,
            description: description.into(),
        }
    }
}

/// A lightweight search hit pointing back at a record on disk.
///
/// `score` is the relevance assigned by the query that produced the reference
/// and has no meaning outside of it. Use a [`Hydrator`](crate::shelf::hydrate::Hydrator)
/// to load the full [`Book`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookReference {
    pub author: String,
    pub title: String,
    pub path: PathBuf,
    pub score: f32,
}

impl BookReference {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
