//! Request lifecycle management for UI code.
//!
//! A [`Request`] wraps one asynchronous operation and exposes its progress
//! as a [`RequestState`]. Only the most recently started call may change
//! that state; older calls are cancelled as soon as a newer one begins.
//! Retryable failures are retried with exponential backoff according to a
//! [`RetryPolicy`].
//!
//! [`Poller`] re-runs a request on a fixed interval and [`FanOut`] runs a
//! set of named operations side by side.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), matching the
//! browser's event loop. Futures returned by this crate must be driven by a
//! local executor such as `wasm_bindgen_futures::spawn_local` or a tokio
//! `LocalSet`.

pub mod fan_out;
pub mod polling;
pub mod request;
pub mod retry;
pub mod state;

pub use fan_out::{FanOut, FanOutBuilder, FanOutStates};
pub use polling::Poller;
pub use request::{Request, RequestOptions};
pub use retry::{Classify, ErrorShape, RetryPolicy, is_retryable};
pub use state::{Phase, RequestState};

use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// A type-erased async operation taking arguments `A`.
pub type Operation<A, T, E> =
    Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, E>>>;
