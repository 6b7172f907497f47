pub mod api_client;
pub mod config;
pub mod error;
pub mod requests;
pub mod responses;
pub mod timer;
pub mod token;

pub use api_client::APIClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use reqwest::StatusCode;
pub use token::{MemoryTokenStore, TokenStore};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier the backend assigns to a submitted task.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub String);

/// Identifier the backend assigns to an uploaded document.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
