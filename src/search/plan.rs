//! Construction of book queries.
//!
//! Every search intent is planned into an immutable [`BookQuery`] by a pure
//! function, so plans can be inspected and tested without touching an index.
//! [`BookQuery::compile`] turns a plan into an engine query against a
//! [`Snapshot`].

use crate::error::{LibraryError, LibraryResult};
use crate::search::fields::{BookSchema, FieldName};
use crate::search::index::Snapshot;
use std::ops::Bound;
use tantivy::Term;
use tantivy::query::{
    BooleanQuery, EmptyQuery, FuzzyTermQuery, Occur, PhraseQuery, Query as EngineQuery,
    RangeQuery, TermQuery,
};
use tantivy::schema::IndexRecordOption;

/// Maximum edit distance of a fuzzy author match.
pub const FUZZY_MAX_EDITS: u8 = 2;

/// Number of missing or displaced words tolerated by a description phrase.
pub const DESCRIPTION_SLOP: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookQuery {
    /// Matches no document.
    Nothing,
    /// Exact match on `isbn`.
    Isbn(String),
    /// Fuzzy match of a single case-folded term on `author`.
    FuzzyAuthor(String),
    /// Inclusive range on `pages`.
    PagesRange { min: u32, max: u32 },
    /// Exact match of a single case-folded term on `author`.
    Author(String),
    /// Phrase of case-folded terms on `description`.
    DescriptionPhrase { terms: Vec<String>, slop: u32 },
    /// Conjunction of at least one criterion.
    Fields(Vec<FieldCriterion>),
    /// Raw query-language text, `description` being the default field.
    FreeText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCriterion {
    Author(String),
    Title(String),
    Description(String),
    Pages { min: u32, max: u32 },
}

/// Input of the fields query. Blank strings and a `0..0` page range count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCriteria {
    pub author: String,
    pub title: String,
    pub description: String,
    pub min_pages: u32,
    pub max_pages: u32,
}

impl FieldCriteria {
    pub fn is_blank(&self) -> bool {
        self.criteria().is_empty()
    }

    fn criteria(&self) -> Vec<FieldCriterion> {
        let mut criteria = Vec::new();
        if !self.author.trim().is_empty() {
            criteria.push(FieldCriterion::Author(fold(&self.author)));
        }
        if !self.title.trim().is_empty() {
            criteria.push(FieldCriterion::Title(fold(&self.title)));
        }
        if !self.description.trim().is_empty() {
            criteria.push(FieldCriterion::Description(fold(&self.description)));
        }
        if self.min_pages != 0 || self.max_pages != 0 {
            criteria.push(FieldCriterion::Pages {
                min: self.min_pages,
                max: self.max_pages,
            });
        }
        criteria
    }
}

impl BookQuery {
    pub fn by_isbn(isbn: &str) -> Self {
        BookQuery::Isbn(isbn.to_owned())
    }

    pub fn by_fuzzy_author(author: &str) -> Self {
        let author = author.trim();
        if author.is_empty() {
            return BookQuery::Nothing;
        }
        BookQuery::FuzzyAuthor(fold(author))
    }

    pub fn by_pages_range(min: u32, max: u32) -> Self {
        if min > max {
            return BookQuery::Nothing;
        }
        BookQuery::PagesRange { min, max }
    }

    pub fn by_author(author: &str) -> Self {
        BookQuery::Author(fold(author))
    }

    /// Splits `description` on whitespace into a sloppy phrase.
    pub fn by_description(description: &str) -> Self {
        BookQuery::DescriptionPhrase {
            terms: description.split_whitespace().map(fold).collect(),
            slop: DESCRIPTION_SLOP,
        }
    }

    /// Fails with [`LibraryError::InvalidArgument`] when every criterion is absent.
    pub fn by_fields(criteria: &FieldCriteria) -> LibraryResult<Self> {
        let criteria = criteria.criteria();
        if criteria.is_empty() {
            return Err(LibraryError::InvalidArgument(
                "all fields are empty or 0".into(),
            ));
        }
        Ok(BookQuery::Fields(criteria))
    }

    pub fn by_query_text(text: &str) -> Self {
        BookQuery::FreeText(text.to_owned())
    }

    /// Builds the engine query for this plan.
    ///
    /// Free text is parsed here; text the query grammar rejects fails with
    /// [`LibraryError::InvalidArgument`].
    pub fn compile(&self, snapshot: &Snapshot) -> LibraryResult<Box<dyn EngineQuery>> {
        let schema = snapshot.schema();
        let query: Box<dyn EngineQuery> = match self {
            BookQuery::Nothing => Box::new(EmptyQuery),
            BookQuery::Isbn(isbn) => term_query(schema, FieldName::Isbn, isbn),
            BookQuery::FuzzyAuthor(author) => {
                let term = Term::from_field_text(schema.author, author);
                Box::new(FuzzyTermQuery::new(term, FUZZY_MAX_EDITS, true))
            }
            BookQuery::PagesRange { min, max } => pages_query(schema, *min, *max),
            BookQuery::Author(author) => term_query(schema, FieldName::Author, author),
            BookQuery::DescriptionPhrase { terms, slop } => phrase_query(schema, terms, *slop),
            BookQuery::Fields(criteria) => {
                let clauses = criteria
                    .iter()
                    .map(|criterion| (Occur::Must, criterion_query(schema, criterion)))
                    .collect();
                Box::new(BooleanQuery::new(clauses))
            }
            BookQuery::FreeText(text) => {
                if let Some(field) = dangling_field(text) {
                    return Err(LibraryError::InvalidArgument(format!(
                        "invalid query `{text}`: no value for field `{field}`"
                    )));
                }
                snapshot
                    .query_parser()
                    .parse_query(text)
                    .map_err(|e| LibraryError::InvalidArgument(format!("invalid query `{text}`: {e}")))?
            }
        };
        Ok(query)
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Finds a field qualifier that is not followed by a value, as in `+author:`.
fn dangling_field(text: &str) -> Option<&str> {
    text.split_whitespace()
        .map(|token| token.trim_start_matches(['+', '-']))
        .find_map(|token| token.strip_suffix(':'))
        .filter(|field| !field.is_empty() && !field.contains([':', '"']))
}

fn term_query(schema: &BookSchema, field: FieldName, text: &str) -> Box<dyn EngineQuery> {
    let term = Term::from_field_text(schema.field(field), text);
    Box::new(TermQuery::new(term, IndexRecordOption::Basic))
}

fn pages_query(schema: &BookSchema, min: u32, max: u32) -> Box<dyn EngineQuery> {
    if min > max {
        return Box::new(EmptyQuery);
    }
    Box::new(RangeQuery::new(
        Bound::Included(Term::from_field_i64(schema.pages, i64::from(min))),
        Bound::Included(Term::from_field_i64(schema.pages, i64::from(max))),
    ))
}

fn phrase_query(schema: &BookSchema, terms: &[String], slop: u32) -> Box<dyn EngineQuery> {
    match terms {
        [] => Box::new(EmptyQuery),
        [single] => term_query(schema, FieldName::Description, single),
        _ => {
            let terms = terms
                .iter()
                .map(|t| Term::from_field_text(schema.description, t))
                .collect();
            let mut phrase = PhraseQuery::new(terms);
            phrase.set_slop(slop);
            Box::new(phrase)
        }
    }
}

fn criterion_query(schema: &BookSchema, criterion: &FieldCriterion) -> Box<dyn EngineQuery> {
    match criterion {
        FieldCriterion::Author(author) => term_query(schema, FieldName::Author, author),
        FieldCriterion::Title(title) => term_query(schema, FieldName::Title, title),
        FieldCriterion::Description(description) => {
            term_query(schema, FieldName::Description, description)
        }
        FieldCriterion::Pages { min, max } => pages_query(schema, *min, *max),
    }
}
