//! On-disk book collections.
//!
//! A [`storage::Shelf`] is a directory of JSON book records. Records are read
//! through the [`records::RecordStore`] contract, and search hits are turned
//! back into full records by the [`hydrate::Hydrator`].

pub mod hydrate;
pub mod records;
pub mod storage;
