//! Opportunity Table Components
//!
//! Filter bar, the table itself and the pager. All three work off one
//! `OpportunityFilters` signal; the core decides when the offset resets.

use leptos::*;

use pipeline_dashboard::filters::{OpportunityFilters, SortField, StageFilter, PIPELINE_STAGES};
use pipeline_dashboard::table::{OpportunityRow, COLUMNS, EMPTY_TABLE_MESSAGE};

#[component]
pub fn FilterBar(filters: RwSignal<OpportunityFilters>) -> impl IntoView {
    let on_stage = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        filters.update(|f| f.set_stage(StageFilter::from_selection(&value)));
    };

    let on_sort = move |ev: ev::Event| {
        if let Ok(field) = event_target_value(&ev).parse::<SortField>() {
            filters.update(|f| f.set_sort_by(field));
        }
    };

    let on_min_amount = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        filters.update(|f| f.set_min_amount(value));
    };

    view! {
        <div class="flex flex-wrap items-end gap-4">
            <label class="flex flex-col text-sm text-gray-400">
                "Stage"
                <select
                    class="mt-1 bg-gray-800 border border-gray-700 rounded-lg px-3 py-2 text-white"
                    prop:value=move || filters.with(|f| f.stage().selection().to_string())
                    on:change=on_stage
                >
                    <option value="">{StageFilter::ALL_LABEL}</option>
                    {PIPELINE_STAGES
                        .iter()
                        .map(|stage| view! { <option value=*stage>{*stage}</option> })
                        .collect_view()}
                </select>
            </label>

            <label class="flex flex-col text-sm text-gray-400">
                "Sort by"
                <select
                    class="mt-1 bg-gray-800 border border-gray-700 rounded-lg px-3 py-2 text-white"
                    prop:value=move || filters.with(|f| f.sort_by().as_param())
                    on:change=on_sort
                >
                    {SortField::ALL
                        .iter()
                        .map(|field| view! { <option value=field.as_param()>{field.label()}</option> })
                        .collect_view()}
                </select>
            </label>

            <label class="flex flex-col text-sm text-gray-400">
                "Min amount"
                <input
                    type="number"
                    min="0"
                    placeholder="Any"
                    class="mt-1 bg-gray-800 border border-gray-700 rounded-lg px-3 py-2 text-white"
                    prop:value=move || filters.with(|f| f.min_amount_text().to_string())
                    on:input=on_min_amount
                />
            </label>
        </div>
    }
}

#[component]
pub fn OpportunityTable(rows: Vec<OpportunityRow>) -> impl IntoView {
    if rows.is_empty() {
        return view! { <p class="text-gray-400 py-8 text-center">{EMPTY_TABLE_MESSAGE}</p> }
            .into_view();
    }

    let body = rows
        .into_iter()
        .map(|row| {
            let cells = row
                .cells()
                .map(|cell| view! { <td class="px-4 py-2">{cell.to_string()}</td> });
            view! {
                <tr class="border-b border-gray-700 last:border-0">{cells.into_iter().collect_view()}</tr>
            }
        })
        .collect_view();

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-sm text-left">
                <thead class="text-gray-400 border-b border-gray-700">
                    <tr>
                        {COLUMNS
                            .iter()
                            .map(|column| view! { <th class="px-4 py-2 font-medium">{*column}</th> })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
    .into_view()
}

/// `Showing a–b of n` plus Previous/Next
#[component]
pub fn PaginationBar(
    filters: RwSignal<OpportunityFilters>,
    #[prop(into)] total: Signal<u64>,
) -> impl IntoView {
    let pagination = move || filters.with(|f| f.pagination(total.get()));

    view! {
        <div class="flex items-center justify-between text-sm text-gray-400">
            <span>{move || pagination().summary()}</span>
            <div class="space-x-2">
                <button
                    class="px-3 py-1 rounded-lg bg-gray-800 border border-gray-700 disabled:opacity-40"
                    disabled=move || !pagination().has_previous()
                    on:click=move |_| filters.update(|f| {
                        f.previous_page();
                    })
                >
                    "Previous"
                </button>
                <button
                    class="px-3 py-1 rounded-lg bg-gray-800 border border-gray-700 disabled:opacity-40"
                    disabled=move || !pagination().has_next()
                    on:click=move |_| {
                        let total = total.get_untracked();
                        filters.update(|f| {
                            f.next_page(total);
                        })
                    }
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
