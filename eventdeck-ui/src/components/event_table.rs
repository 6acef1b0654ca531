//! Event Table Component
//!
//! Tabular list of events with expandable output fields.

use leptos::*;

use crate::state::SecurityEvent;

/// Table of events, rendered in the order given
#[component]
pub fn EventTable(#[prop(into)] events: Signal<Vec<SecurityEvent>>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto rounded-xl shadow bg-white dark:bg-gray-800">
            <table class="min-w-full text-sm">
                <thead class="text-left text-gray-500 dark:text-gray-400 border-b border-gray-200 dark:border-gray-700">
                    <tr>
                        <th class="px-4 py-3">"Time"</th>
                        <th class="px-4 py-3">"Priority"</th>
                        <th class="px-4 py-3">"Rule"</th>
                        <th class="px-4 py-3">"Output"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let events = events.get();
                        if events.is_empty() {
                            view! {
                                <tr>
                                    <td colspan="4" class="px-4 py-6 text-center text-gray-400">"No events"</td>
                                </tr>
                            }.into_view()
                        } else {
                            events.into_iter().map(|event| view! { <EventRow event /> }).collect_view()
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn EventRow(event: SecurityEvent) -> impl IntoView {
    let (expanded, set_expanded) = create_signal(false);
    let fields = event.output_fields.clone();
    let time = event.time.format("%Y-%m-%d %H:%M:%S").to_string();

    view! {
        <tr
            class="border-b border-gray-100 dark:border-gray-700 hover:bg-gray-50 dark:hover:bg-gray-700 cursor-pointer"
            on:click=move |_| set_expanded.update(|e| *e = !*e)
        >
            <td class="px-4 py-2 whitespace-nowrap font-mono">{time}</td>
            <td class="px-4 py-2">
                <span class=format!("px-2 py-1 rounded text-xs font-semibold {}", event.priority.badge_class())>
                    {event.priority.label()}
                </span>
            </td>
            <td class="px-4 py-2 font-medium">{event.rule.clone()}</td>
            <td class="px-4 py-2 text-gray-600 dark:text-gray-300">{event.output.clone()}</td>
        </tr>
        {move || {
            expanded.get().then(|| {
                let rows = fields
                    .iter()
                    .map(|(key, value)| view! {
                        <div class="flex space-x-2">
                            <span class="font-mono text-gray-500">{key.clone()}</span>
                            <span class="font-mono">{value.to_string()}</span>
                        </div>
                    })
                    .collect_view();
                view! {
                    <tr class="bg-gray-50 dark:bg-gray-900">
                        <td colspan="4" class="px-6 py-3 space-y-1">{rows}</td>
                    </tr>
                }
            })
        }}
    }
}
