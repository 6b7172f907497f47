//! Catch-all recovery panel for failures anywhere below it in the tree.
//!
//! Yew cannot intercept a panic during render, so components report a
//! failure they cannot render through [`use_error_reporter`]. The boundary
//! then replaces its children with a recovery panel until the user chooses
//! to try again.

use std::rc::Rc;
use uuid::Uuid;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

/// A failure caught by the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    /// `err_<unix millis>_<9 random chars>`, quoted when reporting issues.
    pub id: String,
    pub detail: String,
}

impl Incident {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            id: generate_incident_id(),
            detail: detail.into(),
        }
    }
}

pub fn generate_incident_id() -> String {
    let millis = jiff::Timestamp::now().as_millisecond();
    let suffix: String =
        Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("err_{millis}_{suffix}")
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryState {
    pub incident: Option<Incident>,
    /// Bumped on recovery so the children mount afresh.
    pub generation: u32,
}

pub enum BoundaryAction {
    Report(Incident),
    Recover,
}

impl Reducible for BoundaryState {
    type Action = BoundaryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            // The first failure is the interesting one.
            BoundaryAction::Report(_) if self.incident.is_some() => self,
            BoundaryAction::Report(incident) => Rc::new(BoundaryState {
                incident: Some(incident),
                generation: self.generation,
            }),
            BoundaryAction::Recover => Rc::new(BoundaryState {
                incident: None,
                generation: self.generation.wrapping_add(1),
            }),
        }
    }
}

/// Reports a failure to the nearest [`ErrorBoundary`].
pub type ErrorReporter = Callback<String>;

/// Outside a boundary, failures are only logged.
#[hook]
pub fn use_error_reporter() -> ErrorReporter {
    use_context::<ErrorReporter>().unwrap_or_else(|| {
        Callback::from(|detail: String| {
            tracing::error!("Unhandled failure outside error boundary: {detail}");
        })
    })
}

#[derive(Properties, PartialEq)]
pub struct ErrorBoundaryProps {
    pub children: Children,
}

#[function_component]
pub fn ErrorBoundary(props: &ErrorBoundaryProps) -> Html {
    let state = use_reducer(BoundaryState::default);

    let reporter: ErrorReporter = {
        let state = state.clone();
        use_callback((), move |detail: String, _| {
            let incident = Incident::new(detail);
            tracing::error!(incident_id = %incident.id, "{}", incident.detail);
            state.dispatch(BoundaryAction::Report(incident));
        })
    };

    let content = match &state.incident {
        Some(incident) => {
            let on_retry = {
                let state = state.clone();
                Callback::from(move |_: MouseEvent| {
                    state.dispatch(BoundaryAction::Recover)
                })
            };
            html! { <RecoveryPanel incident={incident.clone()} {on_retry} /> }
        }
        None => html! {
            <div key={state.generation.to_string()}>
                {props.children.clone()}
            </div>
        },
    };

    html! {
        <ContextProvider<ErrorReporter> context={reporter}>
            {content}
        </ContextProvider<ErrorReporter>>
    }
}

#[derive(Properties, PartialEq)]
struct RecoveryPanelProps {
    incident: Incident,
    on_retry: Callback<MouseEvent>,
}

#[function_component]
fn RecoveryPanel(props: &RecoveryPanelProps) -> Html {
    let navigator = use_navigator();

    let on_reload = Callback::from(|_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });

    let on_home = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Dashboard);
            }
            on_retry.emit(e);
        })
    };

    let button = "px-4 py-2 rounded-md text-sm font-medium border \
                  border-neutral-300 dark:border-neutral-600 \
                  hover:bg-neutral-100 dark:hover:bg-neutral-700";

    html! {
        <div class="max-w-lg mx-auto my-16 p-6 rounded-lg border \
                    border-red-200 dark:border-red-800 bg-red-50 dark:bg-red-900/20">
            <h2 class="text-lg font-semibold text-red-800 dark:text-red-300">
                {"Something went wrong"}
            </h2>
            <p class="mt-2 text-sm text-red-700 dark:text-red-400">
                {"This part of the page failed to load. You can try again, \
                  reload the page or go back to the dashboard."}
            </p>
            <p class="mt-4 text-xs font-mono text-neutral-600 dark:text-neutral-400">
                {format!("Incident: {}", props.incident.id)}
            </p>
            if cfg!(debug_assertions) {
                <pre class="mt-2 p-2 text-xs overflow-x-auto rounded \
                            bg-white dark:bg-neutral-900 text-red-700 dark:text-red-400">
                    {&props.incident.detail}
                </pre>
            }
            <div class="mt-6 flex gap-3">
                <button class={button} onclick={props.on_retry.clone()}>{"Try Again"}</button>
                <button class={button} onclick={on_reload}>{"Reload Page"}</button>
                <button class={button} onclick={on_home}>{"Go Home"}</button>
            </div>
        </div>
    }
}
