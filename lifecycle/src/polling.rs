use crate::request::Request;
use crate::retry::Classify;
use futures::future::{Either, select};
use payloads::timer::sleep;
use std::cell::RefCell;
use std::fmt::Display;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Re-runs a [`Request`] on a fixed interval.
///
/// Fetches start every `interval`, measured from the start of the previous
/// fetch. Polls never overlap: a fetch that outlasts the interval swallows
/// the ticks it spans, and the next fetch starts as soon as it finishes.
pub struct Poller<T, E> {
    request: Request<(), T, E>,
    interval: Duration,
    running: Rc<RefCell<Option<CancellationToken>>>,
}

impl<T, E> Clone for Poller<T, E> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            interval: self.interval,
            running: Rc::clone(&self.running),
        }
    }
}

impl<T, E> Poller<T, E>
where
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    pub fn new(request: Request<(), T, E>, interval: Duration) -> Self {
        Self {
            request,
            interval,
            running: Rc::new(RefCell::new(None)),
        }
    }

    pub fn request(&self) -> &Request<(), T, E> {
        &self.request
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.borrow().is_some()
    }

    /// Start polling: fetch immediately, then once per interval until
    /// [`stop`](Self::stop) is called. Starting again replaces the previous
    /// loop with a fresh one.
    pub fn run(&self) -> impl Future<Output = ()> + 'static {
        let token = CancellationToken::new();
        if let Some(previous) =
            self.running.borrow_mut().replace(token.clone())
        {
            previous.cancel();
        }

        let request = self.request.clone();
        let interval = self.interval;
        async move {
            loop {
                if token.is_cancelled() || request.is_torn_down() {
                    break;
                }
                let mut tick = pin!(sleep(interval));
                // Not raced with the token: a fetch already started when
                // polling stops still completes and updates state.
                let mut fetch = pin!(request.execute(()));
                let overdue = matches!(
                    select(fetch.as_mut(), tick.as_mut()).await,
                    Either::Right(_)
                );
                if overdue {
                    // Overdue; fetch again once this one lands.
                    fetch.await;
                    continue;
                }

                let cancelled = pin!(token.cancelled());
                if let Either::Left(_) = select(cancelled, tick).await {
                    break;
                }
            }
            tracing::debug!("polling stopped");
        }
    }

    /// Stop scheduling new fetches.
    pub fn stop(&self) {
        if let Some(token) = self.running.borrow_mut().take() {
            token.cancel();
        }
    }

    pub fn teardown(&self) {
        self.stop();
        self.request.teardown();
    }
}
