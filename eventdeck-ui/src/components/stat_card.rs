//! Stat Card Component
//!
//! A single counter with a label, used for the summary row.

use leptos::*;

/// Counter card
#[component]
pub fn StatCard(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<i64>,
    /// Tailwind classes for the accent strip
    #[prop(default = "bg-sky-500")]
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class="relative overflow-hidden rounded-lg p-4 shadow bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700">
            <div class=format!("absolute left-0 top-0 h-full w-1 {}", accent) />
            <span class="text-sm capitalize text-gray-500 dark:text-gray-400">{label}</span>
            <div class="text-3xl font-bold mt-2">{move || value.get()}</div>
        </div>
    }
}
