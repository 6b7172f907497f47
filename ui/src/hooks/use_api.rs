use super::render_state;
use lifecycle::{Request, RequestOptions, RequestState};
use payloads::ClientError;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

/// What [`use_api`] hands back to a component.
pub struct UseApiHandle<A, T> {
    pub state: RequestState<T>,
    /// Start a call. Any call still in flight is superseded.
    pub execute: Callback<A>,
    /// Repeat the last successful call's arguments. No-op before the first
    /// success.
    pub refetch: Callback<()>,
    pub reset: Callback<()>,
}

impl<A, T> UseApiHandle<A, T> {
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        render_state(&self.state, context, render_fn)
    }
}

/// Wrap an API call in a cancel-safe, retrying state container.
///
/// The operation is captured on first render; later renders reuse it. With
/// `options.immediate` the call runs once on mount with `A::default()`.
/// Unmounting cancels whatever is in flight.
///
/// # Example
///
/// ```rust,ignore
/// let client = use_api_client();
/// let tasks = use_api(
///     move |()| {
///         let client = client.clone();
///         async move { client.list_tasks().await }
///     },
///     RequestOptions::default().immediate(true),
/// );
/// tasks.render("tasks", |list, _, _| html! { <TaskTable list={list.clone()} /> })
/// ```
#[hook]
pub fn use_api<A, T, F, Fut>(
    operation: F,
    options: RequestOptions<T>,
) -> UseApiHandle<A, T>
where
    A: Clone + Default + 'static,
    T: Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, ClientError>> + 'static,
{
    let state = use_state(RequestState::<T>::default);
    let request: Rc<Request<A, T, ClientError>> =
        use_memo((), move |_| Request::new(operation, options));

    {
        let request = request.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            request.subscribe(move |snapshot| state.set(snapshot.clone()));
            if request.options().immediate {
                yew::platform::spawn_local(request.execute(A::default()));
            }
            move || request.teardown()
        });
    }

    let execute = {
        let request = request.clone();
        Callback::from(move |args: A| {
            yew::platform::spawn_local(request.execute(args));
        })
    };
    let refetch = {
        let request = request.clone();
        Callback::from(move |_| yew::platform::spawn_local(request.refetch()))
    };
    let reset = Callback::from(move |_| request.reset());

    UseApiHandle {
        state: (*state).clone(),
        execute,
        refetch,
        reset,
    }
}
