mod common;

use bookshelf_core::LibraryError;
use bookshelf_core::config::LibraryConfig;
use bookshelf_core::jobs::library::{Library, LibraryEvent, SearchForm};
use bookshelf_core::jobs::slot::{JobOutcome, JobSlot, JobState};
use bookshelf_core::search::plan::FieldCriteria;
use bookshelf_core::shelf::storage::{Shelf, ShelfError};
use common::{den_ororda_platsen, hemingway_books};
use std::sync::mpsc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(30);
const QUIET: Duration = Duration::from_millis(200);

async fn next<T: Send + 'static>(slot: &mut JobSlot<T>) -> JobOutcome<T> {
    timeout(WAIT, slot.next_outcome())
        .await
        .expect("job did not finish in time")
}

async fn next_event(library: &mut Library) -> LibraryEvent {
    timeout(WAIT, library.next_event())
        .await
        .expect("no library event in time")
}

#[tokio::test]
async fn completed_job_reports_its_value() {
    let mut slot: JobSlot<u32> = JobSlot::new("answer");
    assert_eq!(slot.state(), JobState::Idle);

    slot.restart(|| Ok(42));
    assert!(slot.is_running());

    assert!(matches!(next(&mut slot).await, JobOutcome::Succeeded(42)));
    assert_eq!(slot.state(), JobState::Succeeded);
}

#[tokio::test]
async fn restart_discards_superseded_result() {
    let mut slot: JobSlot<u32> = JobSlot::new("restart");
    let (release, gate) = mpsc::channel::<()>();

    let first = slot.restart(move || {
        let _ = gate.recv();
        Ok(1)
    });
    let second = slot.restart(|| Ok(2));
    assert_ne!(first, second);
    assert!(second.generation > first.generation);

    release.send(()).unwrap();

    assert!(matches!(next(&mut slot).await, JobOutcome::Succeeded(2)));
    // the first job's late result never surfaces
    assert!(timeout(QUIET, slot.next_outcome()).await.is_err());
    assert_eq!(slot.state(), JobState::Succeeded);
}

#[tokio::test]
async fn failing_job_reports_failure() {
    let mut slot: JobSlot<u32> = JobSlot::new("failing");

    slot.restart(|| Err(LibraryError::InvalidArgument("nope".into())));

    assert!(matches!(
        next(&mut slot).await,
        JobOutcome::Failed(LibraryError::InvalidArgument(_))
    ));
    assert_eq!(slot.state(), JobState::Failed);
}

#[tokio::test]
async fn panicking_job_reports_failure() {
    let mut slot: JobSlot<u32> = JobSlot::new("panicking");

    slot.restart(|| -> Result<u32, LibraryError> { panic!("worker blew up") });

    assert!(matches!(
        next(&mut slot).await,
        JobOutcome::Failed(LibraryError::Job(_))
    ));
}

#[tokio::test]
async fn cancel_reports_cancelled_and_drops_late_result() {
    let mut slot: JobSlot<u32> = JobSlot::new("cancel");
    assert!(!slot.cancel());

    let (release, gate) = mpsc::channel::<()>();
    slot.restart(move || {
        let _ = gate.recv();
        Ok(1)
    });

    assert!(slot.cancel());
    assert!(matches!(next(&mut slot).await, JobOutcome::Cancelled));
    assert_eq!(slot.state(), JobState::Idle);

    release.send(()).unwrap();
    assert!(timeout(QUIET, slot.next_outcome()).await.is_err());
}

#[tokio::test]
async fn running_signal_follows_job() {
    let mut slot: JobSlot<u32> = JobSlot::new("signal");
    let running = slot.subscribe_running();
    assert!(!*running.borrow());

    let (release, gate) = mpsc::channel::<()>();
    slot.restart(move || {
        let _ = gate.recv();
        Ok(7)
    });
    assert!(*running.borrow());

    release.send(()).unwrap();
    next(&mut slot).await;
    assert!(!*running.borrow());
}

fn library_with_books() -> (TempDir, Library) {
    let tmp = TempDir::new().unwrap();
    let config = LibraryConfig::under(tmp.path());
    let shelf = Shelf::ensure_exists(&config.book_dir).unwrap();
    for book in hemingway_books() {
        shelf.write_book(&book).unwrap();
    }
    let library = Library::open(config).unwrap();
    (tmp, library)
}

#[tokio::test]
async fn library_indexes_then_searches() {
    let (_tmp, mut library) = library_with_books();

    library.start_index_all();
    assert!(library.is_busy());
    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::Indexed(JobOutcome::Succeeded(3))
    ));
    assert!(!library.is_busy());

    let by_isbn = SearchForm {
        isbn: " 978-9177424765 ".into(),
        ..Default::default()
    };
    library.search(&by_isbn);
    match next_event(&mut library).await {
        LibraryEvent::BookFound(JobOutcome::Succeeded(book)) => {
            assert_eq!(book, Some(den_ororda_platsen()))
        }
        other => panic!("unexpected event {other:?}"),
    }

    let by_fields = SearchForm {
        criteria: FieldCriteria {
            author: "Hemingway".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    library.search(&by_fields);
    let references = match next_event(&mut library).await {
        LibraryEvent::ReferencesFound(JobOutcome::Succeeded(references)) => references,
        other => panic!("unexpected event {other:?}"),
    };
    assert_eq!(references.len(), 3);

    let details = library.details(&references[0]).unwrap();
    assert!(hemingway_books().contains(&details));
}

#[tokio::test]
async fn library_reports_failed_jobs() {
    let (_tmp, mut library) = library_with_books();

    library.start_query("+publisher:Bonniers");
    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::ReferencesFound(JobOutcome::Failed(LibraryError::InvalidArgument(_)))
    ));
    assert_eq!(library.references_job().state(), JobState::Failed);

    library.search(&SearchForm::default());
    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::ReferencesFound(JobOutcome::Failed(LibraryError::InvalidArgument(_)))
    ));
}

#[tokio::test]
async fn indexing_a_missing_book_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let mut library = Library::open(LibraryConfig::under(tmp.path())).unwrap();

    library.start_index_all();

    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::Indexed(JobOutcome::Failed(LibraryError::Shelf(ShelfError::NotFound(_))))
    ));
    assert_eq!(library.index_job().state(), JobState::Failed);
}

#[tokio::test]
async fn index_book_job_upserts_one_record() {
    let (_tmp, mut library) = library_with_books();
    let path = library.config().book_dir.join("978-9177424765.json");

    library.start_index_book(&path);

    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::Indexed(JobOutcome::Succeeded(1))
    ));
    assert_eq!(library.query().count_documents().unwrap(), 1);
}

#[tokio::test]
async fn cancel_all_cancels_running_jobs() {
    let (_tmp, mut library) = library_with_books();

    library.start_index_all();
    library.cancel_all();

    assert!(matches!(
        next_event(&mut library).await,
        LibraryEvent::Indexed(JobOutcome::Cancelled)
    ));
    assert!(!library.is_busy());
    assert!(timeout(QUIET, library.next_event()).await.is_err());
}
