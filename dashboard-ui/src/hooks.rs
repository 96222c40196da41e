//! Fetch Hook
//!
//! Signal-backed driver for the core fetch state. Each run of the effect takes
//! a ticket; a response whose ticket was superseded is dropped.

use leptos::*;
use std::future::Future;

use pipeline_dashboard::fetch::{FetchState, Ticket, TrackedState};

/// Run `producer` now and again whenever the signals read by `deps` change.
pub fn use_fetch<D, T, F, Fut>(deps: impl Fn() -> D + 'static, producer: F) -> Signal<FetchState<T>>
where
    D: 'static,
    T: Clone + 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let tracked = create_rw_signal(TrackedState::<T>::default());

    create_effect(move |_| {
        let request = producer(deps());

        let mut ticket = Ticket::default();
        tracked.update(|state| ticket = state.begin());

        spawn_local(async move {
            let result = request.await;
            if let Err(e) = &result {
                web_sys::console::warn_1(&format!("Fetch failed: {}", e).into());
            }
            // The page may have unmounted while the request was in flight
            let _ = tracked.try_update(|state| state.resolve(ticket, result));
        });
    });

    Signal::derive(move || tracked.with(|state| state.state().clone()))
}
