//! Resource
//!
//! Tokio driver for [`FetchState`]: runs producers on the runtime and publishes
//! state through a watch channel. Each request takes its ticket and applies its
//! result inside the channel's write lock, so a superseded response can never
//! land after a newer request has started.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{FetchState, Ticket, TrackedState};

/// A fetched value observable by any number of views
pub struct Resource<T> {
    name: Arc<str>,
    state: Arc<watch::Sender<TrackedState<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle resource; `name` only shows up in logs
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let (tx, _rx) = watch::channel(TrackedState::default());
        Self {
            name: name.into(),
            state: Arc::new(tx),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().state().clone()
    }

    /// Receiver that wakes on every state change
    pub fn subscribe(&self) -> watch::Receiver<TrackedState<T>> {
        self.state.subscribe()
    }

    /// Mark loading and take a ticket for a new request
    pub fn begin(&self) -> Ticket {
        let mut ticket = Ticket::default();
        self.state.send_modify(|tracked| ticket = tracked.begin());
        tracing::debug!(resource = %self.name, generation = ticket.generation(), "Fetch started");
        ticket
    }

    /// Publish a result for `ticket`; superseded results are dropped.
    pub fn resolve<E: Display>(&self, ticket: Ticket, result: Result<T, E>) -> bool {
        if let Err(e) = &result {
            tracing::warn!(
                resource = %self.name,
                generation = ticket.generation(),
                error = %e,
                "Fetch failed"
            );
        }

        let applied = self
            .state
            .send_if_modified(|tracked| tracked.resolve(ticket, result));

        if !applied {
            tracing::debug!(
                resource = %self.name,
                generation = ticket.generation(),
                "Discarded superseded response"
            );
        }
        applied
    }

    /// Run `producer` now; its result is published only if no newer fetch
    /// started in the meantime.
    pub fn fetch<Fut, E>(&self, producer: Fut) -> JoinHandle<bool>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let ticket = self.begin();
        let resource = self.clone();

        tokio::spawn(async move {
            let result = producer.await;
            resource.resolve(ticket, result)
        })
    }

    /// Refetch whenever `deps` changes, starting with its current value.
    ///
    /// The returned task ends when every sender of `deps` is dropped.
    pub fn follow<D, F, Fut, E>(&self, mut deps: watch::Receiver<D>, producer: F) -> JoinHandle<()>
    where
        D: Clone + Send + Sync + 'static,
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let resource = self.clone();

        tokio::spawn(async move {
            loop {
                let current = deps.borrow_and_update().clone();
                resource.fetch(producer(current));

                if deps.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation()
    }

    /// Wait until a request newer than `generation` has started
    pub async fn started_after(&self, generation: u64) {
        let mut rx = self.subscribe();
        // The sender lives in `self`; an error cannot happen while we hold it.
        let _ = rx.wait_for(|tracked| tracked.generation() > generation).await;
    }

    /// Wait until nothing is in flight and a result has been published.
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|tracked| tracked.state().is_settled()).await {
            Ok(tracked) => tracked.state().clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.snapshot(),
        };
        state
    }
}
