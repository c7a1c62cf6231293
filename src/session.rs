//! Live result of one view.
//!
//! Every load/aggregate request takes a ticket. When a request finishes, its
//! result replaces the live one only if no newer ticket has been issued in the
//! meantime; a superseded result is dropped, never merged. Each request works
//! on its own batch, so the only shared state is this slot.

use log::debug;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifies one request against a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Status of the newest request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
struct SessionState<T> {
    generation: u64,
    status: ViewStatus,
    live: Option<Arc<T>>,
}

/// Holder of at most one live result per view
#[derive(Debug)]
pub struct ViewSession<T> {
    state: Mutex<SessionState<T>>,
}

impl<T> Default for ViewSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSession<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState {
                generation: 0,
                status: ViewStatus::Idle,
                live: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a request; any request still in flight becomes stale
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.generation += 1;
        state.status = ViewStatus::Loading;
        debug!("View request {} started", state.generation);
        Ticket(state.generation)
    }

    /// Whether `ticket` is still the newest request
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock().generation == ticket.0
    }

    /// Finish a request
    ///
    /// Returns `true` when the result was accepted. A stale ticket leaves the
    /// live result and status untouched. A failed request keeps the previous
    /// live result available but reports `Failed`.
    pub fn complete<E: fmt::Display>(&self, ticket: Ticket, result: Result<T, E>) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.0 {
            debug!(
                "Discarding result of request {} (newest is {})",
                ticket.0, state.generation
            );
            return false;
        }

        match result {
            Ok(value) => {
                state.live = Some(Arc::new(value));
                state.status = ViewStatus::Ready;
            }
            Err(e) => {
                state.status = ViewStatus::Failed(e.to_string());
            }
        }
        true
    }

    pub fn status(&self) -> ViewStatus {
        self.lock().status.clone()
    }

    /// The live result, if any request has succeeded
    pub fn current(&self) -> Option<Arc<T>> {
        self.lock().live.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let session: ViewSession<u64> = ViewSession::new();
        assert_eq!(session.status(), ViewStatus::Idle);

        let ticket = session.begin();
        assert_eq!(session.status(), ViewStatus::Loading);
        assert!(session.complete::<String>(ticket, Ok(7)));

        assert_eq!(session.status(), ViewStatus::Ready);
        assert_eq!(session.current().as_deref(), Some(&7));
    }

    #[test]
    fn test_stale_result_discarded() {
        let session: ViewSession<&str> = ViewSession::new();
        let old = session.begin();
        let new = session.begin();

        assert!(session.complete::<String>(new, Ok("new")));
        assert!(!session.complete::<String>(old, Ok("old")));
        assert_eq!(session.current().as_deref(), Some(&"new"));
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let session: ViewSession<u64> = ViewSession::new();
        let first = session.begin();
        session.complete::<String>(first, Ok(1));

        let second = session.begin();
        assert!(session.complete(second, Err("HTTP 500")));

        assert_eq!(session.status(), ViewStatus::Failed("HTTP 500".to_string()));
        assert_eq!(session.current().as_deref(), Some(&1));
    }
}
