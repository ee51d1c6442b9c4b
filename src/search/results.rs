//! Accumulation of paginated search results.

use crate::domain::{Book, BookReference};
use crate::error::LibraryResult;
use crate::search::index::Snapshot;
use crate::shelf::hydrate::Hydrator;
use tantivy::DocAddress;
use tantivy::query::Query as EngineQuery;
use tracing::debug;

/// Number of hits requested from the engine per page.
pub const PAGE_SIZE: usize = 10;

/// One ranked hit. `rank` is the hit's zero-based position in the result stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub score: f32,
    pub address: DocAddress,
    pub rank: usize,
}

/// Drains a ranked page source.
///
/// `fetch` is called with the last hit received so far (`None` for the first
/// page) and the page size, and must return the hits ranked directly after it.
/// Collection stops at the first empty page. Hits are kept in the order the
/// source returned them.
pub fn collect_pages<H, E, F>(page_size: usize, mut fetch: F) -> Result<Vec<H>, E>
where
    F: FnMut(Option<&H>, usize) -> Result<Vec<H>, E>,
{
    let page_size = page_size.max(1);
    let mut hits: Vec<H> = Vec::new();

    loop {
        let page = fetch(hits.last(), page_size)?;
        if page.is_empty() {
            break;
        }
        hits.extend(page);
    }

    Ok(hits)
}

/// Collects every hit of `query` in `snapshot`, best first.
pub fn collect_hits(snapshot: &Snapshot, query: &dyn EngineQuery) -> LibraryResult<Vec<ScoredDoc>> {
    let hits = collect_pages(PAGE_SIZE, |after, limit| {
        snapshot.page_after(query, after, limit)
    })?;
    debug!(hits = hits.len(), "collected search hits");
    Ok(hits)
}

/// Projects hits into references using stored fields only.
pub fn into_references(snapshot: &Snapshot, hits: &[ScoredDoc]) -> LibraryResult<Vec<BookReference>> {
    let mut references = Vec::with_capacity(hits.len());
    for hit in hits {
        let stored = snapshot.stored(hit)?;
        references.push(BookReference {
            author: stored.author,
            title: stored.title,
            path: stored.path,
            score: hit.score,
        });
    }
    Ok(references)
}

/// Loads the full record behind every hit, in hit order.
pub fn into_books(
    snapshot: &Snapshot,
    hits: &[ScoredDoc],
    hydrator: &Hydrator<'_>,
) -> LibraryResult<Vec<Book>> {
    let references = into_references(snapshot, hits)?;
    Ok(hydrator.hydrate_all(&references)?)
}
