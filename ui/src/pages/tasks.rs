use lifecycle::RequestOptions;
use payloads::requests::{TaskPriority, TaskRequest, validate_task_description};
use payloads::responses::{AgentStatus, TaskActionResult, TaskList, TaskResult, TaskStatus};
use payloads::TaskId;
use web_sys::{HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::client::use_api_client;
use crate::components::ProgressBar;
use crate::contexts::use_toast;
use crate::hooks::{use_api, use_title};
use crate::utils::{format_datetime, fraction_to_percent};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum TaskAction {
    #[default]
    Pause,
    Resume,
    Cancel,
}

impl TaskAction {
    fn label(&self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Cancel => "Cancel",
        }
    }

    fn done(&self) -> &'static str {
        match self {
            Self::Pause => "Task paused",
            Self::Resume => "Task resumed",
            Self::Cancel => "Task cancelled",
        }
    }

    /// Actions that make sense for a task in `status`.
    fn available(status: AgentStatus) -> &'static [TaskAction] {
        match status {
            AgentStatus::Paused => &[Self::Resume, Self::Cancel],
            status if status.is_terminal() => &[],
            _ => &[Self::Pause, Self::Cancel],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TaskCommand {
    action: TaskAction,
    task_id: String,
}

#[function_component]
pub fn TasksPage() -> Html {
    use_title("Tasks");
    let client = use_api_client();
    let toast = use_toast();

    let tasks = {
        let client = client.clone();
        use_api(
            move |()| {
                let client = client.clone();
                async move { client.list_tasks().await }
            },
            RequestOptions::<TaskList>::default().immediate(true),
        )
    };

    let command = {
        let client = client.clone();
        let toast = toast.clone();
        let reload = tasks.execute.clone();
        let failed = toast.clone();
        use_api(
            move |command: TaskCommand| {
                let client = client.clone();
                async move {
                    let task_id = TaskId(command.task_id);
                    match command.action {
                        TaskAction::Pause => client.pause_task(&task_id).await,
                        TaskAction::Resume => client.resume_task(&task_id).await,
                        TaskAction::Cancel => client.cancel_task(&task_id).await,
                    }
                    .map(|result| (command.action, result))
                }
            },
            RequestOptions::<(TaskAction, TaskActionResult)>::default()
                .on_success(move |(action, _)| {
                    toast.success(action.done());
                    reload.emit(());
                })
                .on_error(move |error| failed.error(error)),
        )
    };

    let on_command = command.execute.clone();
    let on_refresh = {
        let refetch = tasks.refetch.clone();
        Callback::from(move |_: MouseEvent| refetch.emit(()))
    };

    html! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{"Tasks"}</h1>
                <button
                    onclick={on_refresh}
                    disabled={tasks.state.loading}
                    class="px-3 py-1.5 rounded-md text-sm border border-neutral-300 dark:border-neutral-600 hover:bg-neutral-100 dark:hover:bg-neutral-700 disabled:opacity-50"
                >
                    {"Refresh"}
                </button>
            </div>
            <TaskForm />
            {tasks.render("tasks", |list, refreshing, _| html! {
                <section class={classes!(refreshing.then_some("opacity-60"))}>
                    <h2 class="font-semibold mb-3">{format!("All tasks ({})", list.total_tasks)}</h2>
                    if list.tasks.is_empty() {
                        <p class="text-sm text-neutral-500">{"No tasks yet."}</p>
                    }
                    <ul class="space-y-4">
                        {for list.tasks.iter().map(|task| html! {
                            <TaskRow
                                key={task.task_id.to_string()}
                                task={task.clone()}
                                busy={command.state.loading}
                                on_command={on_command.clone()}
                            />
                        })}
                    </ul>
                </section>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct TaskRowProps {
    task: TaskStatus,
    busy: bool,
    on_command: Callback<TaskCommand>,
}

#[function_component]
fn TaskRow(props: &TaskRowProps) -> Html {
    let task = &props.task;

    html! {
        <li class="p-4 rounded-lg border border-neutral-200 dark:border-neutral-700 space-y-3">
            <div class="flex items-start justify-between gap-4">
                <div>
                    <p class="font-medium">{&task.description}</p>
                    <p class="text-xs text-neutral-500">
                        {format!("{} · updated {}", task.status.label(), format_datetime(&task.updated_at))}
                    </p>
                </div>
                <div class="flex gap-2">
                    {for TaskAction::available(task.status).iter().map(|action| {
                        let on_command = props.on_command.clone();
                        let command = TaskCommand {
                            action: *action,
                            task_id: task.task_id.to_string(),
                        };
                        html! {
                            <button
                                disabled={props.busy}
                                onclick={move |_| on_command.emit(command.clone())}
                                class="px-2 py-1 text-xs rounded border border-neutral-300 dark:border-neutral-600 hover:bg-neutral-100 dark:hover:bg-neutral-700 disabled:opacity-50"
                            >
                                {action.label()}
                            </button>
                        }
                    })}
                </div>
            </div>
            <ProgressBar value={fraction_to_percent(task.progress)} />
            if !task.agents.is_empty() {
                <ul class="text-xs text-neutral-600 dark:text-neutral-400 space-y-1">
                    {for task.agents.iter().map(|agent| html! {
                        <li>{format!("{} ({}): {}, {:.0}%", agent.name, agent.role, agent.status.label(), agent.progress)}</li>
                    })}
                </ul>
            }
        </li>
    }
}

#[function_component]
fn TaskForm() -> Html {
    let client = use_api_client();
    let toast = use_toast();
    let description = use_state(String::new);
    let priority = use_state(TaskPriority::default);
    let validation = use_state(|| None::<String>);

    let run = {
        let failed = toast.clone();
        use_api(
            move |request: TaskRequest| {
                let client = client.clone();
                async move { client.execute_task(&request).await }
            },
            RequestOptions::<TaskResult>::default()
                .on_success(move |_| toast.success("Task completed"))
                .on_error(move |error| failed.error(format!("Task failed: {error}"))),
        )
    };

    let on_description = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            description.set(input.value());
        })
    };
    let on_priority = {
        let priority = priority.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(value) = TaskPriority::parse(&select.value()) {
                priority.set(value);
            }
        })
    };
    let on_submit = {
        let description = description.clone();
        let priority = priority.clone();
        let validation = validation.clone();
        let execute = run.execute.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(error) = validate_task_description(&description) {
                validation.set(Some(error.to_string()));
                return;
            }
            validation.set(None);
            execute.emit(TaskRequest {
                priority: *priority,
                ..TaskRequest::new(description.trim())
            });
        })
    };

    html! {
        <form onsubmit={on_submit} class="space-y-4 p-4 rounded-lg border border-neutral-200 dark:border-neutral-700">
            <div>
                <label for="task-description" class="block text-sm font-medium mb-1">{"Describe the task"}</label>
                <textarea
                    id="task-description"
                    rows="3"
                    value={(*description).clone()}
                    oninput={on_description}
                    class="w-full px-3 py-2 rounded-md border border-neutral-300 dark:border-neutral-600 bg-white dark:bg-neutral-800"
                />
                if let Some(error) = &*validation {
                    <p class="mt-1 text-sm text-red-600 dark:text-red-400">{error}</p>
                }
            </div>
            <div class="flex items-end gap-4">
                <div>
                    <label for="task-priority" class="block text-sm font-medium mb-1">{"Priority"}</label>
                    <select
                        id="task-priority"
                        onchange={on_priority}
                        class="px-3 py-2 rounded-md border border-neutral-300 dark:border-neutral-600 bg-white dark:bg-neutral-800"
                    >
                        {for TaskPriority::ALL.iter().map(|p| html! {
                            <option value={p.as_str()} selected={*p == *priority}>{p.as_str()}</option>
                        })}
                    </select>
                </div>
                <button
                    type="submit"
                    disabled={run.state.loading}
                    class="px-4 py-2 rounded-md bg-neutral-900 dark:bg-white text-white dark:text-neutral-900 text-sm font-medium disabled:opacity-50"
                >
                    {if run.state.loading { "Running..." } else { "Run task" }}
                </button>
            </div>
            {run.render("task result", |result, _, _| html! {
                <div class="p-3 rounded-md bg-neutral-50 dark:bg-neutral-800 text-sm space-y-1">
                    <p>{format!(
                        "{} in {:.1}s, confidence {}%",
                        result.status.label(),
                        result.execution_time,
                        fraction_to_percent(result.overall_confidence),
                    )}</p>
                    <pre class="text-xs overflow-x-auto whitespace-pre-wrap">
                        {serde_json::to_string_pretty(&result.final_result).unwrap_or_default()}
                    </pre>
                </div>
            })}
        </form>
    }
}
