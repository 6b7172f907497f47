use payloads::timer::backoff_delay;
use payloads::{ClientConfig, ClientError};
use std::time::Duration;

/// How a failed operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retry_count: u32,
    /// Delay before the first retry; doubles for each one after.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: payloads::config::DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(
                payloads::config::DEFAULT_RETRY_DELAY_MS,
            ),
        }
    }
}

impl RetryPolicy {
    pub fn new(retry_count: u32, retry_delay: Duration) -> Self {
        Self {
            retry_count,
            retry_delay,
        }
    }

    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.retry_attempts, config.retry_delay)
    }

    /// Delay before retry number `attempt` (1-based): `delay * 2^(attempt-1)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        backoff_delay(self.retry_delay, attempt.saturating_sub(1))
    }
}

/// What a failure says about the response, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    /// A response arrived with this HTTP status.
    Status(u16),
    /// No response was received at all.
    NoResponse,
    Other,
}

/// Errors that can be sorted into an [`ErrorShape`].
pub trait Classify {
    fn shape(&self) -> ErrorShape;
}

impl Classify for ClientError {
    fn shape(&self) -> ErrorShape {
        match self {
            ClientError::Application { status, .. } => {
                ErrorShape::Status(status.as_u16())
            }
            ClientError::Transport(_) => ErrorShape::NoResponse,
            ClientError::Decode(_) => ErrorShape::Other,
        }
    }
}

/// Only server errors and missing responses are worth retrying. Client
/// errors, redirects and malformed responses are not.
pub fn is_retryable(shape: ErrorShape) -> bool {
    match shape {
        ErrorShape::Status(status) => (500..600).contains(&status),
        ErrorShape::NoResponse => true,
        ErrorShape::Other => false,
    }
}
