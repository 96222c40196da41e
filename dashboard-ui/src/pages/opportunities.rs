//! Opportunities Page
//!
//! Filter bar, error banner, table and pager. Every filter change refetches;
//! only the most recently started request may update the table.

use leptos::*;

use pipeline_dashboard::filters::OpportunityFilters;
use pipeline_dashboard::table::rows;

use crate::api;
use crate::components::{ErrorBanner, FilterBar, Loading, OpportunityTable, PaginationBar};
use crate::hooks::use_fetch;

#[component]
pub fn Opportunities() -> impl IntoView {
    let filters = create_rw_signal(OpportunityFilters::new());

    let listing = use_fetch(
        move || filters.get(),
        |filters: OpportunityFilters| async move {
            api::fetch_opportunities(&filters.to_query()).await
        },
    );

    let total = Signal::derive(move || {
        listing.with(|state| state.data.as_ref().map_or(0, |page| page.total))
    });

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Opportunities"</h1>

            <FilterBar filters=filters />

            {move || listing.with(|state| state.error.clone())
                .map(|message| view! { <ErrorBanner message=message /> })}

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                {move || listing.with(|state| {
                    if state.loading {
                        view! { <Loading /> }.into_view()
                    } else {
                        match &state.data {
                            Some(page) => view! { <OpportunityTable rows=rows(&page.records) /> }.into_view(),
                            None => view! {}.into_view(),
                        }
                    }
                })}

                {move || (total.get() > 0).then(|| view! {
                    <PaginationBar filters=filters total=total />
                })}
            </section>
        </div>
    }
}
