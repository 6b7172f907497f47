mod cancellation;
mod fan_out;
mod http;
mod polling;
mod retry;

use lifecycle::{Classify, ErrorShape};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// An error with a chosen shape, so tests control retryability.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeError {
    shape: ErrorShape,
    message: String,
}

impl FakeError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            shape: ErrorShape::Status(status),
            message: message.into(),
        }
    }

    pub fn no_response() -> Self {
        Self {
            shape: ErrorShape::NoResponse,
            message: "Network error".into(),
        }
    }
}

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Classify for FakeError {
    fn shape(&self) -> ErrorShape {
        self.shape
    }
}

/// Shared invocation counter.
#[derive(Clone, Default)]
pub struct Calls(Rc<Cell<u32>>);

impl Calls {
    /// Record a call and return its 1-based number.
    pub fn hit(&self) -> u32 {
        let n = self.0.get() + 1;
        self.0.set(n);
        n
    }

    pub fn count(&self) -> u32 {
        self.0.get()
    }
}
