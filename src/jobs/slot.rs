use crate::error::{LibraryError, LibraryResult};
use std::fmt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How a job ended, as seen by the caller.
#[derive(Debug)]
pub enum JobOutcome<T> {
    Succeeded(T),
    Failed(LibraryError),
    Cancelled,
}

impl<T> JobOutcome<T> {
    pub fn into_result(self) -> Option<LibraryResult<T>> {
        match self {
            JobOutcome::Succeeded(value) => Some(Ok(value)),
            JobOutcome::Failed(e) => Some(Err(e)),
            JobOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    /// Idle, the last job succeeded.
    Succeeded,
    /// Idle, the last job failed.
    Failed,
}

impl JobState {
    pub fn is_running(self) -> bool {
        self == JobState::Running
    }
}

/// Identifies one run of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTicket {
    pub id: Uuid,
    pub generation: u64,
}

struct Completion<T> {
    ticket: JobTicket,
    outcome: JobOutcome<T>,
}

/// Single-flight runner for one caller action.
///
/// At most one job per slot counts at any time. [`JobSlot::restart`] replaces
/// the current job instead of queueing behind it.
pub struct JobSlot<T> {
    action: &'static str,
    state: JobState,
    current: Option<JobTicket>,
    generation: u64,
    running_tx: watch::Sender<bool>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<T> fmt::Debug for JobSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSlot")
            .field("action", &self.action)
            .field("state", &self.state)
            .field("current", &self.current)
            .finish()
    }
}

impl<T: Send + 'static> JobSlot<T> {
    pub fn new(action: &'static str) -> Self {
        let (running_tx, _) = watch::channel(false);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        JobSlot {
            action,
            state: JobState::Idle,
            current: None,
            generation: 0,
            running_tx,
            completion_tx,
            completion_rx,
        }
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Progress signal: `true` while a job of this slot is running.
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Starts `work` on the blocking pool, superseding any running job.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restart<F>(&mut self, work: F) -> JobTicket
    where
        F: FnOnce() -> LibraryResult<T> + Send + 'static,
    {
        if let Some(previous) = self.current.filter(|_| self.state.is_running()) {
            debug!(action = self.action, job = %previous.id, "superseding running job");
        }

        self.generation += 1;
        let ticket = JobTicket {
            id: Uuid::new_v4(),
            generation: self.generation,
        };
        self.current = Some(ticket);
        self.set_state(JobState::Running);

        let action = self.action;
        let completion_tx = self.completion_tx.clone();
        let handle = tokio::task::spawn_blocking(work);

        tokio::spawn(async move {
            let outcome = match handle.await {
                Ok(Ok(value)) => JobOutcome::Succeeded(value),
                Ok(Err(e)) => JobOutcome::Failed(e),
                Err(e) if e.is_cancelled() => JobOutcome::Cancelled,
                Err(e) => JobOutcome::Failed(LibraryError::Job(e.to_string())),
            };
            // the receiver lives as long as the slot
            let _ = completion_tx.send(Completion { ticket, outcome });
            debug!(action, job = %ticket.id, "job finished");
        });

        info!(action, job = %ticket.id, "job started");
        ticket
    }

    /// Supersedes the running job without starting a new one.
    ///
    /// The next call to [`JobSlot::next_outcome`] reports
    /// [`JobOutcome::Cancelled`]. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.generation += 1;
        let ticket = JobTicket {
            id: Uuid::new_v4(),
            generation: self.generation,
        };
        self.current = Some(ticket);

        let _ = self.completion_tx.send(Completion {
            ticket,
            outcome: JobOutcome::Cancelled,
        });
        info!(action = self.action, "job cancelled");
        true
    }

    /// Waits for the outcome of the current job and applies it to the slot.
    ///
    /// Outcomes of superseded jobs are dropped. When no job is running this
    /// waits until one is started and finishes, which makes it suitable as a
    /// branch of `tokio::select!`; it is cancel safe.
    pub async fn next_outcome(&mut self) -> JobOutcome<T> {
        while let Some(completion) = self.completion_rx.recv().await {
            if !self.state.is_running() || self.current != Some(completion.ticket) {
                debug!(action = self.action, job = %completion.ticket.id, "discarding superseded result");
                continue;
            }

            let next = match &completion.outcome {
                JobOutcome::Succeeded(_) => JobState::Succeeded,
                JobOutcome::Failed(e) => {
                    warn!(action = self.action, job = %completion.ticket.id, error = %e, "job failed");
                    JobState::Failed
                }
                JobOutcome::Cancelled => JobState::Idle,
            };
            self.set_state(next);
            return completion.outcome;
        }

        // the slot owns a sender, so the channel never closes
        std::future::pending().await
    }

    fn set_state(&mut self, state: JobState) {
        self.state = state;
        self.running_tx.send_replace(state.is_running());
    }
}
