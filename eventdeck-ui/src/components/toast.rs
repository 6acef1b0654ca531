//! Toast Notification Component
//!
//! Shows the store's error message until dismissed or replaced.

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::state::{Action, Dispatch, Store};

/// Milliseconds an error stays on screen
const ERROR_TIMEOUT_MS: u32 = 5000;

/// Toast notification container
#[component]
pub fn Toast(store: Store) -> impl IntoView {
    // Dropping a pending timeout cancels it
    let pending = store_value::<Option<Timeout>>(None);

    create_effect(move |_| {
        let timeout = store.error.get().map(|message| {
            Timeout::new(ERROR_TIMEOUT_MS, move || {
                store.dispatch(Action::ExpireError(message));
            })
        });
        pending.set_value(timeout);
    });

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            {move || {
                store.error.get().map(|message| view! {
                    <div class="flex items-center space-x-3 bg-red-600 text-white px-4 py-3 rounded-lg shadow-lg">
                        <span class="text-lg">"✕"</span>
                        <span class="text-sm font-medium">{message}</span>
                        <button
                            class="ml-2 text-white/80 hover:text-white"
                            on:click=move |_| store.dispatch(Action::ClearError)
                        >
                            "Dismiss"
                        </button>
                    </div>
                })
            }}
        </div>
    }
}
