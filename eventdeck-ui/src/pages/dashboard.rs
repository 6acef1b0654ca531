//! Dashboard Page
//!
//! Overview of the latest snapshot: counters, priority and rule charts,
//! and an events-per-minute timeline.

use chrono::Duration;
use leptos::*;

use crate::components::chart::priority_color;
use crate::components::{BarChart, BarDatum, ChartPalette, StatCard, TimelineChart};
use crate::state::{Priority, Store};

/// Number of rules shown in the rule chart
const TOP_RULES: usize = 8;

/// Dashboard page component
#[component]
pub fn Dashboard(store: Store, #[prop(into)] palette: Signal<ChartPalette>) -> impl IntoView {
    let snapshot = store.snapshot;

    let total = Signal::derive(move || snapshot.with(|s| s.total()));
    let retained = Signal::derive(move || snapshot.with(|s| s.events.len() as i64));
    let retention = Signal::derive(move || snapshot.with(|s| s.retention as i64));
    let outputs = Signal::derive(move || snapshot.with(|s| s.outputs.len() as i64));

    let priority_data = Signal::derive(move || {
        snapshot.with(|s| {
            s.counts_by_priority()
                .into_iter()
                .map(|(priority, count)| BarDatum {
                    label: priority.label().to_string(),
                    value: count,
                    color: Some(priority_color(priority)),
                })
                .collect::<Vec<_>>()
        })
    });

    let rule_data = Signal::derive(move || {
        snapshot.with(|s| {
            s.top_rules(TOP_RULES)
                .into_iter()
                .map(|(rule, count)| BarDatum {
                    label: rule,
                    value: count,
                    color: None,
                })
                .collect::<Vec<_>>()
        })
    });

    let timeline = Signal::derive(move || snapshot.with(|s| s.timeline(Duration::minutes(1))));

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <span class="text-sm text-gray-500 dark:text-gray-400">
                    {move || snapshot.with(|s| {
                        if s.outputs.is_empty() {
                            "No forwarders reporting".to_string()
                        } else {
                            format!("Outputs: {}", s.outputs.join(", "))
                        }
                    })}
                </span>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard label="Total events" value=total accent="bg-sky-500" />
                <StatCard label="Retained" value=retained accent="bg-emerald-500" />
                <StatCard label="Retention" value=retention accent="bg-amber-500" />
                <StatCard label="Outputs" value=outputs accent="bg-purple-500" />
            </div>

            <PriorityCounters store />

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <BarChart title="Events by priority" data=priority_data palette />
                <BarChart title="Top rules" data=rule_data palette />
            </div>

            <TimelineChart title="Events per minute" points=timeline palette />
        </div>
    }
}

/// Row of per-priority counters, most severe first
#[component]
fn PriorityCounters(store: Store) -> impl IntoView {
    view! {
        <div class="flex flex-wrap gap-2">
            {move || {
                store.snapshot.with(|s| {
                    s.counts_by_priority()
                        .into_iter()
                        .filter(|(priority, _)| *priority != Priority::Unknown)
                        .map(|(priority, count)| view! {
                            <span class=format!("px-3 py-1 rounded-full text-sm font-medium {}", priority.badge_class())>
                                {format!("{} {}", priority.label(), count)}
                            </span>
                        })
                        .collect_view()
                })
            }}
        </div>
    }
}
