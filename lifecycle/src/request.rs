use crate::retry::{Classify, RetryPolicy, is_retryable};
use crate::state::{Phase, RequestState};
use crate::Operation;
use futures::future::{Either, FutureExt, select};
use payloads::timer::sleep;
use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use tokio_util::sync::CancellationToken;

type Listener<T> = Rc<dyn Fn(&RequestState<T>)>;

/// Behaviour of a [`Request`] beyond the operation itself.
pub struct RequestOptions<T> {
    pub retry: RetryPolicy,
    /// Run once with the initial arguments as soon as the owner mounts.
    /// Honoured by the UI hooks; [`Request`] itself never starts on its own.
    pub immediate: bool,
    pub on_success: Option<Rc<dyn Fn(&T)>>,
    pub on_error: Option<Rc<dyn Fn(&str)>>,
}

impl<T> Default for RequestOptions<T> {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            immediate: false,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for RequestOptions<T> {
    fn clone(&self) -> Self {
        Self {
            retry: self.retry,
            immediate: self.immediate,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> RequestOptions<T> {
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + 'static) -> Self {
        self.on_success = Some(Rc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_error = Some(Rc::new(callback));
        self
    }
}

/// A reusable, cancel-safe, retrying wrapper around one async operation.
///
/// Cloning is cheap and every clone drives the same state.
pub struct Request<A, T, E> {
    inner: Rc<Inner<A, T, E>>,
}

impl<A, T, E> Clone for Request<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<A, T, E> {
    operation: Operation<A, T, E>,
    options: RequestOptions<T>,
    state: RefCell<RequestState<T>>,
    retry_count: Cell<u32>,
    /// Token of the most recently started call.
    current: RefCell<Option<CancellationToken>>,
    last_args: RefCell<Option<A>>,
    listener: RefCell<Option<Listener<T>>>,
    torn_down: Cell<bool>,
}

impl<A, T, E> Request<A, T, E>
where
    A: Clone + 'static,
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    pub fn new<F, Fut>(operation: F, options: RequestOptions<T>) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let operation: Operation<A, T, E> =
            Rc::new(move |args| operation(args).boxed_local());
        Self {
            inner: Rc::new(Inner {
                operation,
                options,
                state: RefCell::new(RequestState::default()),
                retry_count: Cell::new(0),
                current: RefCell::new(None),
                last_args: RefCell::new(None),
                listener: RefCell::new(None),
                torn_down: Cell::new(false),
            }),
        }
    }

    pub fn options(&self) -> &RequestOptions<T> {
        &self.inner.options
    }

    /// Start a call with `args`.
    ///
    /// The state switches to pending and any previous call is cancelled
    /// before this returns; the returned future performs the call and must
    /// be polled to completion (or dropped) by the caller's executor.
    pub fn execute(&self, args: A) -> impl Future<Output = ()> + 'static {
        let started = self.begin(args);
        let inner = Rc::clone(&self.inner);
        async move {
            if let Some((token, args)) = started {
                run(inner, token, args).await;
            }
        }
    }

    /// Repeat the last call. Does nothing unless a previous call succeeded.
    pub fn refetch(&self) -> impl Future<Output = ()> + 'static {
        let has_data = self.inner.state.borrow().data.is_some();
        let args = has_data
            .then(|| self.inner.last_args.borrow().clone())
            .flatten();
        let call = args.map(|args| self.execute(args));
        async move {
            if let Some(call) = call {
                call.await;
            }
        }
    }

    /// Cancel any outstanding call and return to the idle state.
    pub fn reset(&self) {
        self.cancel_current();
        self.inner.retry_count.set(0);
        *self.inner.state.borrow_mut() = RequestState::default();
        notify(&self.inner);
    }

    /// Cancel any outstanding call and refuse further calls. Used when the
    /// owning component goes away.
    pub fn teardown(&self) {
        self.inner.torn_down.set(true);
        self.cancel_current();
        self.inner.listener.borrow_mut().take();
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.get()
    }

    /// Call `listener` with a snapshot after every state change, replacing
    /// any earlier listener.
    pub fn subscribe(&self, listener: impl Fn(&RequestState<T>) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn state(&self) -> RequestState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase()
    }

    /// Retries performed so far by the current call.
    pub fn retry_count(&self) -> u32 {
        self.inner.retry_count.get()
    }

    fn cancel_current(&self) {
        if let Some(token) = self.inner.current.borrow_mut().take() {
            token.cancel();
        }
    }

    fn begin(&self, args: A) -> Option<(CancellationToken, A)> {
        if self.inner.torn_down.get() {
            tracing::debug!("ignoring execute on a torn down request");
            return None;
        }

        let token = CancellationToken::new();
        if let Some(previous) =
            self.inner.current.borrow_mut().replace(token.clone())
        {
            previous.cancel();
        }
        *self.inner.last_args.borrow_mut() = Some(args.clone());
        self.inner.retry_count.set(0);
        self.inner.state.borrow_mut().begin();
        notify(&self.inner);

        Some((token, args))
    }
}

async fn run<A, T, E>(
    inner: Rc<Inner<A, T, E>>,
    token: CancellationToken,
    args: A,
) where
    A: Clone + 'static,
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    // Cancellation is polled first so a superseded call never runs another
    // step of its operation.
    let cancelled = pin!(token.cancelled());
    let attempts = pin!(attempt_with_retries(&inner, &token, args));
    let outcome = match select(cancelled, attempts).await {
        Either::Left(_) => return,
        Either::Right((outcome, _)) => outcome,
    };
    if token.is_cancelled() {
        return;
    }

    inner.current.borrow_mut().take();
    inner.retry_count.set(0);

    match outcome {
        Ok(data) => {
            inner.state.borrow_mut().succeed(data.clone());
            notify(&inner);
            if let Some(on_success) = inner.options.on_success.clone() {
                on_success(&data);
            }
        }
        Err(message) => {
            inner.state.borrow_mut().fail(message.clone());
            notify(&inner);
            if let Some(on_error) = inner.options.on_error.clone() {
                on_error(&message);
            }
        }
    }
}

async fn attempt_with_retries<A, T, E>(
    inner: &Inner<A, T, E>,
    token: &CancellationToken,
    args: A,
) -> Result<T, String>
where
    A: Clone,
    E: Classify + Display,
{
    let policy = inner.options.retry;
    let mut attempt = 0;
    loop {
        let error = match (inner.operation)(args.clone()).await {
            Ok(data) => return Ok(data),
            Err(error) => error,
        };

        let shape = error.shape();
        if attempt >= policy.retry_count || !is_retryable(shape) {
            tracing::debug!(attempts = attempt + 1, ?shape, "request failed: {error}");
            return Err(error.to_string());
        }

        attempt += 1;
        if !token.is_cancelled() {
            inner.retry_count.set(attempt);
        }
        let delay = policy.delay_for(attempt);
        tracing::warn!(attempt, ?delay, ?shape, "retrying request: {error}");
        sleep(delay).await;
    }
}

/// Hand the listener a snapshot. No borrow is held while it runs, so the
/// listener may call back into the request.
fn notify<A, T: Clone, E>(inner: &Inner<A, T, E>) {
    let Some(listener) = inner.listener.borrow().clone() else {
        return;
    };
    let snapshot = inner.state.borrow().clone();
    listener(&snapshot);
}
