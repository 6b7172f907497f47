use lifecycle::{FanOut, FanOutStates};
use payloads::responses::{DashboardOverview, SystemHealth, TaskList};
use std::time::Duration;
use yew::prelude::*;

use crate::client::use_api_client;
use crate::components::use_error_reporter;
use crate::hooks::{render_state, use_fan_out, use_polling, use_title};
use crate::utils::{format_datetime, fraction_to_percent};

const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);
const OVERVIEW: &str = "overview";
const TASKS: &str = "tasks";

#[derive(Debug, Clone, PartialEq)]
enum Panel {
    Overview(DashboardOverview),
    Tasks(TaskList),
}

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Dashboard");
    let client = use_api_client();
    let report = use_error_reporter();
    let auto_refresh = use_state(|| true);

    let health = {
        let client = client.clone();
        use_polling(
            move || {
                let client = client.clone();
                async move { client.system_health().await }
            },
            HEALTH_POLL_INTERVAL,
            *auto_refresh,
        )
    };

    let panels = use_fan_out(move || {
        let overview_client = client.clone();
        let tasks_client = client;
        FanOut::builder()
            .operation(OVERVIEW, move || {
                let client = overview_client.clone();
                async move { client.dashboard_overview().await.map(Panel::Overview) }
            })
            .operation(TASKS, move || {
                let client = tasks_client.clone();
                async move { client.list_tasks().await.map(Panel::Tasks) }
            })
            .build()
    });

    {
        let miswired = miswired_panel(&panels.states);
        use_effect_with(miswired, move |miswired| {
            if let Some(panel) = miswired {
                report.emit(format!(
                    "dashboard panel `{panel}` received data for another panel"
                ));
            }
        });
    }

    let on_toggle = {
        let auto_refresh = auto_refresh.clone();
        Callback::from(move |_: Event| auto_refresh.set(!*auto_refresh))
    };
    let on_refresh = {
        let refresh = panels.refresh.clone();
        let refetch = health.refetch.clone();
        Callback::from(move |_: MouseEvent| {
            refresh.emit(());
            refetch.emit(());
        })
    };

    html! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{"Dashboard"}</h1>
                <div class="flex items-center gap-4">
                    <label class="flex items-center gap-2 text-sm text-neutral-600 dark:text-neutral-400">
                        <input type="checkbox" checked={*auto_refresh} onchange={on_toggle} />
                        {"Auto-refresh health"}
                    </label>
                    <button
                        onclick={on_refresh}
                        disabled={panels.states.any_loading()}
                        class="px-3 py-1.5 rounded-md text-sm border border-neutral-300 dark:border-neutral-600 hover:bg-neutral-100 dark:hover:bg-neutral-700 disabled:opacity-50"
                    >
                        {"Refresh"}
                    </button>
                </div>
            </div>

            {health.render("system health", |health, refreshing, error| {
                render_health(health, refreshing, error)
            })}

            if let Some(state) = panels.states.get(OVERVIEW) {
                {render_state(state, "overview", |panel, _, _| match panel {
                    Panel::Overview(overview) => render_overview(overview),
                    Panel::Tasks(_) => html! {},
                })}
            }

            if let Some(state) = panels.states.get(TASKS) {
                {render_state(state, "tasks", |panel, _, _| match panel {
                    Panel::Tasks(list) => render_recent_tasks(list),
                    Panel::Overview(_) => html! {},
                })}
            }
        </div>
    }
}

/// The first panel holding another panel's data, if the fan-out was wired
/// wrong.
fn miswired_panel(states: &FanOutStates<Panel>) -> Option<&'static str> {
    let holds = |name: &str, expected: fn(&Panel) -> bool| {
        states.result(name).is_some_and(|panel| !expected(panel))
    };
    if holds(OVERVIEW, |panel| matches!(panel, Panel::Overview(_))) {
        Some(OVERVIEW)
    } else if holds(TASKS, |panel| matches!(panel, Panel::Tasks(_))) {
        Some(TASKS)
    } else {
        None
    }
}

fn health_badge(status: &str) -> &'static str {
    match status {
        "healthy" => "bg-green-100 text-green-800 dark:bg-green-900/40 dark:text-green-300",
        "degraded" | "warning" => "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/40 dark:text-yellow-300",
        _ => "bg-red-100 text-red-800 dark:bg-red-900/40 dark:text-red-300",
    }
}

fn render_health(
    health: &SystemHealth,
    refreshing: bool,
    error: Option<&String>,
) -> Html {
    html! {
        <section class="p-4 rounded-lg border border-neutral-200 dark:border-neutral-700">
            <div class="flex items-center justify-between">
                <h2 class="font-semibold">{"System health"}</h2>
                <span class={classes!("px-2", "py-0.5", "rounded", "text-xs", "font-medium", health_badge(&health.overall_health))}>
                    {&health.overall_health}
                </span>
            </div>
            <p class="mt-1 text-xs text-neutral-500">
                {format!("Checked {}", format_datetime(&health.timestamp))}
                if refreshing { {" · refreshing"} }
            </p>
            if let Some(error) = error {
                <p class="mt-2 text-sm text-red-600 dark:text-red-400">
                    {format!("Last check failed: {error}")}
                </p>
            }
            if !health.recommendations.is_empty() {
                <ul class="mt-3 list-disc list-inside text-sm text-neutral-700 dark:text-neutral-300">
                    {for health.recommendations.iter().map(|r| html! { <li>{r}</li> })}
                </ul>
            }
        </section>
    }
}

fn render_overview(overview: &DashboardOverview) -> Html {
    let metrics = &overview.system_metrics;
    let cards = [
        ("Agents", metrics.total_agents.to_string()),
        ("Tasks", metrics.total_tasks.to_string()),
        ("Documents", metrics.total_documents.to_string()),
        (
            "Uptime",
            metrics.system_uptime.clone().unwrap_or_else(|| "n/a".into()),
        ),
    ];

    html! {
        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
            {for cards.into_iter().map(|(label, value)| html! {
                <div class="p-4 rounded-lg bg-neutral-50 dark:bg-neutral-800">
                    <p class="text-sm text-neutral-500 dark:text-neutral-400">{label}</p>
                    <p class="mt-1 text-2xl font-semibold">{value}</p>
                </div>
            })}
        </section>
    }
}

fn render_recent_tasks(list: &TaskList) -> Html {
    if list.tasks.is_empty() {
        return html! {
            <p class="text-sm text-neutral-500">{"No tasks yet."}</p>
        };
    }

    html! {
        <section>
            <h2 class="font-semibold mb-3">{format!("Recent tasks ({})", list.total_tasks)}</h2>
            <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {for list.tasks.iter().map(|task| html! {
                    <li key={task.task_id.to_string()} class="py-3 flex items-center justify-between">
                        <span class="text-sm">{&task.description}</span>
                        <span class="text-xs text-neutral-500">
                            {format!("{} · {}%", task.status.label(), fraction_to_percent(task.progress))}
                        </span>
                    </li>
                })}
            </ul>
        </section>
    }
}
