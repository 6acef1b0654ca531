//! App Root Component
//!
//! Mounting, start-up wiring and the routed application shell.

use leptos::*;
use leptos_router::*;
use thiserror::Error;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::{ChartPalette, Nav, Toast};
use crate::endpoint::Endpoints;
use crate::pages::{Dashboard, Events};
use crate::state::{Action, ChannelOptions, Dispatch, RealtimeChannel, Store};

/// Id of the element the dashboard renders into
pub const MOUNT_POINT_ID: &str = "app";

/// Errors raised while attaching the application to the page
#[derive(Debug, Error, PartialEq)]
pub enum MountError {
    #[error("no element with id '{0}' in the document")]
    MissingElement(String),

    #[error("element '{0}' is not an HTML element")]
    NotAnHtmlElement(String),
}

/// Render `f` inside the element with the given id
///
/// Nothing is attached when the element is missing.
pub fn mount<F, N>(id: &str, f: F) -> Result<(), MountError>
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let element = document()
        .get_element_by_id(id)
        .ok_or_else(|| MountError::MissingElement(id.to_string()))?;
    let parent = element
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| MountError::NotAnHtmlElement(id.to_string()))?;

    leptos::mount_to(parent, f);
    tracing::info!(id, "Dashboard mounted");
    Ok(())
}

/// Start the dashboard in the default mount point
pub fn mount_app() -> Result<(), MountError> {
    mount_app_at(MOUNT_POINT_ID)
}

/// Start the dashboard in the element with the given id
///
/// Creates the store, opens the realtime channel, loads the initial
/// snapshot and display settings, then renders [`App`].
pub fn mount_app_at(id: &str) -> Result<(), MountError> {
    mount(id, || {
        let endpoints = Endpoints::resolve();
        let store = Store::new();
        let palette = Signal::derive(move || ChartPalette::for_mode(store.display_mode.get()));

        let channel = RealtimeChannel::new(endpoints.ws.clone(), ChannelOptions::default(), store);
        channel.connect();
        on_cleanup(move || channel.close());

        load_initial(endpoints.api, store);

        view! { <App store palette /> }
    })
}

/// Fetch display settings and the current snapshot over HTTP
///
/// The realtime channel also sends a snapshot on connect; this covers the
/// time before it opens and never replaces a snapshot it already delivered.
fn load_initial(api_base: String, store: Store) {
    spawn_local(async move {
        match api::check_health(&api_base).await {
            Ok(health) => tracing::info!(
                version = %health.version,
                events = health.events,
                connections = health.connections,
                "Server reachable"
            ),
            Err(e) => tracing::warn!(error = %e, "Health check failed"),
        }

        match api::fetch_config(&api_base).await {
            Ok(config) => store.dispatch(Action::SetDisplayMode(config.display_mode)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch config");
                store.dispatch(Action::ReportError(format!("Failed to load settings: {}", e)));
            }
        }

        match api::fetch_events(&api_base).await {
            Ok(snapshot) => store.dispatch(Action::SeedEvents(snapshot)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch events");
                store.dispatch(Action::ReportError(format!("Failed to load events: {}", e)));
            }
        }
    });
}

/// Root application component
#[component]
pub fn App(store: Store, #[prop(into)] palette: Signal<ChartPalette>) -> impl IntoView {
    let root_class = move || {
        let theme = match store.display_mode.get() {
            crate::state::DisplayMode::Dark => "dark bg-gray-900 text-white",
            crate::state::DisplayMode::Light => "bg-gray-50 text-gray-900",
        };
        format!("eventdeck-root min-h-screen flex flex-col {}", theme)
    };

    view! {
        <Router>
            <div class=root_class>
                <Nav store />

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=move || view! { <Dashboard store palette /> } />
                        <Route path="/ui" view=move || view! { <Dashboard store palette /> } />
                        <Route path="/ui/events" view=move || view! { <Events store /> } />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Footer store />

                <Toast store />
            </div>
        </Router>
    }
}

/// Footer component showing connection status
#[component]
fn Footer(store: Store) -> impl IntoView {
    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-white dark:bg-gray-800 border-t border-gray-200 dark:border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="flex items-center space-x-2">
                    {move || {
                        if store.connected.get() {
                            view! {
                                <span class="flex items-center space-x-1 text-green-500">
                                    <span class="w-2 h-2 bg-green-500 rounded-full pulse" />
                                    <span>"Connected"</span>
                                </span>
                            }.into_view()
                        } else {
                            view! {
                                <span class="flex items-center space-x-1 text-red-500">
                                    <span class="w-2 h-2 bg-red-500 rounded-full" />
                                    <span>"Disconnected"</span>
                                </span>
                            }.into_view()
                        }
                    }}
                </div>

                <div class="text-gray-500 dark:text-gray-400">
                    {move || {
                        store.last_sync.get()
                            .map(|dt| format!("Last sync: {}", dt.format("%H:%M:%S")))
                            .unwrap_or_else(|| "Not synced".to_string())
                    }}
                </div>
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/ui"
                class="px-6 py-3 bg-sky-600 hover:bg-sky-700 text-white rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
