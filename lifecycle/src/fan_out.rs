use crate::request::{Request, RequestOptions};
use crate::retry::{Classify, RetryPolicy};
use crate::state::RequestState;
use futures::future::join_all;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::rc::{Rc, Weak};

type Entries<T, E> = Vec<(String, Request<(), T, E>)>;
type Listener<T> = Rc<dyn Fn(&FanOutStates<T>)>;

/// Snapshot of every named operation in a [`FanOut`].
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutStates<T> {
    pub states: BTreeMap<String, RequestState<T>>,
}

impl<T> Default for FanOutStates<T> {
    fn default() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }
}

impl<T> FanOutStates<T> {
    pub fn get(&self, name: &str) -> Option<&RequestState<T>> {
        self.states.get(name)
    }

    pub fn result(&self, name: &str) -> Option<&T> {
        self.states.get(name).and_then(|state| state.data.as_ref())
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.states.get(name).and_then(|state| state.error.as_deref())
    }

    pub fn any_loading(&self) -> bool {
        self.states.values().any(|state| state.loading)
    }

    pub fn any_error(&self) -> bool {
        self.states.values().any(|state| state.error.is_some())
    }

    /// Error messages keyed by operation name.
    pub fn errors(&self) -> BTreeMap<&str, &str> {
        self.states
            .iter()
            .filter_map(|(name, state)| {
                state.error.as_deref().map(|error| (name.as_str(), error))
            })
            .collect()
    }
}

/// Runs a fixed set of named operations concurrently and tracks each one
/// independently. A failure in one operation does not affect the others.
pub struct FanOut<T, E> {
    entries: Rc<Entries<T, E>>,
    listener: Rc<RefCell<Option<Listener<T>>>>,
}

impl<T, E> Clone for FanOut<T, E> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
            listener: Rc::clone(&self.listener),
        }
    }
}

pub struct FanOutBuilder<T, E> {
    entries: Entries<T, E>,
    retry: RetryPolicy,
}

impl<T, E> FanOutBuilder<T, E>
where
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    /// Retry policy applied to operations added after this call.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn operation<F, Fut>(mut self, name: impl Into<String>, operation: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let options = RequestOptions::default().retry(self.retry);
        let request = Request::new(move |()| operation(), options);
        self.entries.push((name.into(), request));
        self
    }

    pub fn build(self) -> FanOut<T, E> {
        let fan_out = FanOut {
            entries: Rc::new(self.entries),
            listener: Rc::new(RefCell::new(None)),
        };

        for (_, request) in fan_out.entries.iter() {
            let entries = Rc::downgrade(&fan_out.entries);
            let listener = Rc::downgrade(&fan_out.listener);
            request.subscribe(move |_| forward(&entries, &listener));
        }

        fan_out
    }
}

/// Rebuild the aggregate snapshot and hand it to the fan-out listener.
fn forward<T, E>(
    entries: &Weak<Entries<T, E>>,
    listener: &Weak<RefCell<Option<Listener<T>>>>,
) where
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    let (Some(entries), Some(listener)) = (entries.upgrade(), listener.upgrade())
    else {
        return;
    };
    let Some(listener) = listener.borrow().clone() else {
        return;
    };
    listener(&snapshot(&entries));
}

fn snapshot<T, E>(entries: &Entries<T, E>) -> FanOutStates<T>
where
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    FanOutStates {
        states: entries
            .iter()
            .map(|(name, request)| (name.clone(), request.state()))
            .collect(),
    }
}

impl<T, E> FanOut<T, E>
where
    T: Clone + 'static,
    E: Classify + Display + 'static,
{
    /// Operations are not retried unless [`FanOutBuilder::retry`] is set.
    pub fn builder() -> FanOutBuilder<T, E> {
        FanOutBuilder {
            entries: Vec::new(),
            retry: RetryPolicy::none(),
        }
    }

    /// Run every operation concurrently. Each operation's previous call, if
    /// still in flight, is superseded.
    pub fn execute_all(&self) -> impl Future<Output = ()> + 'static {
        let calls: Vec<_> = self
            .entries
            .iter()
            .map(|(_, request)| request.execute(()))
            .collect();
        async move {
            join_all(calls).await;
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn states(&self) -> FanOutStates<T> {
        snapshot(&self.entries)
    }

    pub fn state(&self, name: &str) -> Option<RequestState<T>> {
        self.request(name).map(Request::state)
    }

    pub fn result(&self, name: &str) -> Option<T> {
        self.state(name).and_then(|state| state.data)
    }

    pub fn any_loading(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, request)| request.state().loading)
    }

    pub fn any_error(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, request)| request.state().error.is_some())
    }

    pub fn errors(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(name, request)| {
                request.state().error.map(|error| (name.clone(), error))
            })
            .collect()
    }

    pub fn subscribe(&self, listener: impl Fn(&FanOutStates<T>) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn reset(&self) {
        for (_, request) in self.entries.iter() {
            request.reset();
        }
    }

    pub fn teardown(&self) {
        self.listener.borrow_mut().take();
        for (_, request) in self.entries.iter() {
            request.teardown();
        }
    }

    fn request(&self, name: &str) -> Option<&Request<(), T, E>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, request)| request)
    }
}
