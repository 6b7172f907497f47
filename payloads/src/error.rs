use reqwest::StatusCode;
use serde_json::{Map, Value};

/// Every failure the [`APIClient`](crate::APIClient) reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Application {
        status: StatusCode,
        message: String,
        /// Machine-readable error code, when the backend supplies one.
        code: Option<String>,
        /// Structured details, when the backend supplies them.
        details: Option<Value>,
    },
    /// No response was received: connection refused, DNS failure, CORS
    /// block, timeout or client-side abort.
    #[error("{}", transport_message(.0))]
    Transport(#[source] reqwest::Error),
    /// A success status whose body could not be decoded.
    #[error("Unexpected response from server.")]
    Decode(#[source] reqwest::Error),
}

fn transport_message(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "The request timed out. Please try again."
    } else {
        "Network error. Please check your connection."
    }
}

impl ClientError {
    /// The HTTP status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Application { status, .. } => Some(*status),
            Self::Transport(_) => None,
            Self::Decode(error) => error.status(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Application { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Application { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(error) if error.is_timeout())
    }

    /// Build an application error from a status and raw response body.
    ///
    /// Understands `{"message", "code", "details"}` bodies as well as the
    /// backend's `{"detail": "..."}` and `{"detail": {"message", ...}}`
    /// forms. A plain-text body becomes the message; otherwise a generic
    /// message naming the status is used.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let fallback =
            || format!("Request failed with status code {}", status.as_u16());

        let (message, code, details) =
            match serde_json::from_str::<Value>(body) {
                Ok(Value::Object(fields)) => {
                    let parsed = extract_fields(&fields);
                    (parsed.0.unwrap_or_else(fallback), parsed.1, parsed.2)
                }
                Ok(Value::String(text)) if !text.trim().is_empty() => {
                    (text, None, None)
                }
                Ok(_) => (fallback(), None, None),
                Err(_) if !body.trim().is_empty() => {
                    (body.trim().to_string(), None, None)
                }
                Err(_) => (fallback(), None, None),
            };

        Self::Application {
            status,
            message,
            code,
            details,
        }
    }
}

type ErrorFields = (Option<String>, Option<String>, Option<Value>);

fn extract_fields(fields: &Map<String, Value>) -> ErrorFields {
    let mut message = fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    let mut code = fields.get("code").and_then(scalar_to_string);
    let mut details = fields.get("details").filter(|d| !d.is_null()).cloned();

    match fields.get("detail") {
        Some(Value::String(text)) if message.is_none() => {
            message = Some(text.clone());
        }
        Some(Value::Object(nested)) => {
            let (m, c, d) = extract_fields(nested);
            message = message.or(m);
            code = code.or(c);
            details = details.or(d);
        }
        // Validation failures arrive as a list of field errors.
        Some(list @ Value::Array(_)) if details.is_none() => {
            details = Some(list.clone());
        }
        _ => {}
    }

    (message, code, details)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
