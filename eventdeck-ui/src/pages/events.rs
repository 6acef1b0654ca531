//! Events Page
//!
//! Filterable list of retained events, newest first.

use leptos::*;

use crate::components::EventTable;
use crate::state::{Priority, Store};

/// Events page component
#[component]
pub fn Events(store: Store) -> impl IntoView {
    let (priority, set_priority) = create_signal::<Option<Priority>>(None);
    let (query, set_query) = create_signal(String::new());

    let rows = Signal::derive(move || {
        let priority = priority.get();
        query.with(|q| store.snapshot.with(|s| s.filtered(priority, q)))
    });

    let on_priority = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        set_priority.set(if value.is_empty() {
            None
        } else {
            Some(Priority::parse(&value))
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Events"</h1>
                <span class="text-sm text-gray-500 dark:text-gray-400">
                    {move || format!("{} of {}", rows.with(Vec::len), store.snapshot.with(|s| s.events.len()))}
                </span>
            </div>

            <div class="flex flex-wrap gap-4">
                <select
                    class="px-3 py-2 rounded-lg border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-800"
                    on:change=on_priority
                >
                    <option value="">"All priorities"</option>
                    {Priority::ALL
                        .iter()
                        .map(|p| view! { <option value=p.label()>{p.label()}</option> })
                        .collect_view()}
                </select>
                <input
                    type="search"
                    placeholder="Filter by rule, output or host"
                    class="flex-1 min-w-[16rem] px-3 py-2 rounded-lg border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-800"
                    prop:value=query
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
            </div>

            <EventTable events=rows />
        </div>
    }
}
