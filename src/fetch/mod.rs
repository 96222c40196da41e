//! Fetch State
//!
//! The `{data, loading, error}` triple behind every fetched view, and the
//! request-generation guard that keeps a superseded response from overwriting
//! the state of a newer request.
//!
//! Ordering contract: visible state always reflects the most recently
//! *initiated* request. Every request takes a [`Ticket`] when it starts; only
//! the holder of the latest ticket may publish its result.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "native")]
mod resource;

#[cfg(feature = "native")]
pub use resource::Resource;

/// Loading/error/data state of one fetched value
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    /// A request went out
    pub fn start(&mut self) {
        self.loading = true;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// Keeps the previous data (stale-while-error).
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn apply<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(data) => self.succeed(data),
            Err(e) => self.fail(e.to_string()),
        }
    }

    /// Nothing in flight and at least one request has completed
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.data.is_some() || self.error.is_some())
    }
}

/// Identifies one initiated request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Fetch state paired with the generation that produced it
#[derive(Debug)]
pub struct TrackedState<T> {
    tracker: RequestTracker,
    state: FetchState<T>,
}

impl<T> Default for TrackedState<T> {
    fn default() -> Self {
        Self {
            tracker: RequestTracker::new(),
            state: FetchState::default(),
        }
    }
}

impl<T> TrackedState<T> {
    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Generation of the most recently started request (0 before any)
    pub fn generation(&self) -> u64 {
        self.tracker.latest()
    }

    /// Mark loading and hand out the ticket for the new request
    pub fn begin(&mut self) -> Ticket {
        self.state.start();
        self.tracker.issue()
    }

    /// Publish a result; returns `false` (and changes nothing) when the ticket
    /// was superseded.
    pub fn resolve<E: std::fmt::Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if !self.tracker.is_latest(ticket) {
            return false;
        }
        self.state.apply(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_clears_error() {
        let mut state: FetchState<u32> = FetchState::default();
        state.start();
        state.fail("boom".to_string());
        state.start();
        state.succeed(7);

        assert_eq!(state.data, Some(7));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut state: FetchState<u32> = FetchState::default();
        state.succeed(1);
        state.start();
        state.apply(Err::<u32, _>("Network error"));

        assert_eq!(state.data, Some(1));
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(!state.loading);
    }

    #[test]
    fn test_later_ticket_wins_regardless_of_arrival() {
        let mut tracked: TrackedState<&str> = TrackedState::default();
        let first = tracked.begin();
        let second = tracked.begin();

        assert!(tracked.resolve(second, Ok::<_, String>("B")));
        assert!(!tracked.resolve(first, Ok::<_, String>("A")));

        assert_eq!(tracked.state().data, Some("B"));
        assert!(!tracked.state().loading);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut tracked: TrackedState<u32> = TrackedState::default();
        let first = tracked.begin();
        let second = tracked.begin();

        assert!(!tracked.resolve(first, Err::<u32, _>("late failure")));
        assert!(tracked.state().loading);
        assert!(tracked.resolve(second, Ok::<_, String>(2)));
        assert!(tracked.state().error.is_none());
    }

    #[test]
    fn test_tracker_is_monotonic() {
        let tracker = RequestTracker::new();
        let a = tracker.issue();
        let b = tracker.issue();
        assert!(b > a);
        assert!(tracker.is_latest(b));
        assert!(!tracker.is_latest(a));
        assert_eq!(tracker.latest(), b.generation());
    }
}
