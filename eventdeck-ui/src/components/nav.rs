//! Navigation Component
//!
//! Header navigation bar with brand, links and theme toggle.

use leptos::*;
use leptos_router::*;

use crate::state::{Action, Dispatch, DisplayMode, Store};

/// Navigation header component
#[component]
pub fn Nav(store: Store) -> impl IntoView {
    let toggle_theme = move |_| {
        let next = match store.display_mode.get_untracked() {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        };
        store.dispatch(Action::SetDisplayMode(next));
    };

    view! {
        <nav class="bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/ui" class="flex items-center space-x-3">
                        <span class="text-2xl">"🛡"</span>
                        <span class="text-xl font-bold">"Eventdeck"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/ui" label="Dashboard" />
                        <NavLink href="/ui/events" label="Events" />
                        <button
                            on:click=toggle_theme
                            class="ml-4 px-3 py-2 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700"
                            title="Toggle theme"
                        >
                            {move || match store.display_mode.get() {
                                DisplayMode::Light => "🌙",
                                DisplayMode::Dark => "☀",
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="px-4 py-2 rounded-lg text-gray-600 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700 transition-colors"
            active_class="bg-gray-100 dark:bg-gray-700 font-semibold"
        >
            {label}
        </A>
    }
}
