pub mod use_api;
pub mod use_fan_out;
pub mod use_polling;
pub mod use_push_route;
pub mod use_title;

pub use use_api::{UseApiHandle, use_api};
pub use use_fan_out::{UseFanOutHandle, use_fan_out};
pub use use_polling::{UsePollingHandle, use_polling};
pub use use_push_route::use_push_route;
pub use use_title::use_title;

use lifecycle::RequestState;
use yew::prelude::*;

/// Render a request's state with contextual loading and error messages.
///
/// - No data + loading: "Loading {context}..."
/// - No data + error: "Error loading {context}: ..."
/// - No data, idle: nothing
/// - Has data: `render_fn(data, is_loading, error)`, where `is_loading` means
///   a refresh is in flight and `error` comes from a failed refresh (the
///   earlier data is still shown).
pub fn render_state<T, F>(
    state: &RequestState<T>,
    context: &str,
    render_fn: F,
) -> Html
where
    F: Fn(&T, bool, Option<&String>) -> Html,
{
    match &state.data {
        Some(data) => render_fn(data, state.loading, state.error.as_ref()),
        None if state.loading => html! {
            <div class="text-center py-12">
                <p class="text-neutral-600 dark:text-neutral-400">
                    {format!("Loading {context}...")}
                </p>
            </div>
        },
        None => match &state.error {
            Some(error) => html! {
                <div class="p-4 rounded-md bg-red-50 \
                           dark:bg-red-900/20 border \
                           border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">
                        {format!("Error loading {context}: {error}")}
                    </p>
                </div>
            },
            None => html! {},
        },
    }
}
