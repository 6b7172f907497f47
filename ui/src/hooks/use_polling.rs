use super::render_state;
use lifecycle::{Poller, Request, RequestOptions, RequestState, RetryPolicy};
use payloads::ClientError;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use yew::prelude::*;

pub struct UsePollingHandle<T> {
    pub state: RequestState<T>,
    /// Fetch now without waiting for the next tick.
    pub refetch: Callback<()>,
}

impl<T> UsePollingHandle<T> {
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        render_state(&self.state, context, render_fn)
    }
}

/// Fetch immediately and then every `interval` while `enabled` is true.
///
/// Turning `enabled` off stops scheduling; a fetch already in flight still
/// lands. Turning it back on fetches immediately. Failures are not retried
/// beyond the next tick.
#[hook]
pub fn use_polling<T, F, Fut>(
    fetch: F,
    interval: Duration,
    enabled: bool,
) -> UsePollingHandle<T>
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, ClientError>> + 'static,
{
    let state = use_state(RequestState::<T>::default);
    let poller: Rc<Poller<T, ClientError>> = use_memo(interval, move |interval| {
        let options = RequestOptions::default().retry(RetryPolicy::none());
        Poller::new(Request::new(move |()| fetch(), options), *interval)
    });

    {
        let poller = poller.clone();
        let state = state.clone();
        use_effect_with(interval, move |_| {
            poller
                .request()
                .subscribe(move |snapshot| state.set(snapshot.clone()));
            move || poller.teardown()
        });
    }

    {
        let poller = poller.clone();
        use_effect_with((interval, enabled), move |(_, enabled)| {
            if *enabled {
                yew::platform::spawn_local(poller.run());
            }
            move || poller.stop()
        });
    }

    let refetch = Callback::from(move |_| {
        yew::platform::spawn_local(poller.request().execute(()));
    });

    UsePollingHandle {
        state: (*state).clone(),
        refetch,
    }
}
