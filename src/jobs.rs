//! Background jobs for long-running index and query work.
//!
//! Work runs on tokio's blocking pool and reports back over a channel. The
//! caller observes outcomes on its own task through
//! [`slot::JobSlot::next_outcome`], which is also the only place a slot's
//! state changes once a job is running. Starting a job for an action that
//! already has one in flight supersedes it: the earlier job runs to
//! completion but its result is discarded.

pub mod library;
pub mod slot;
