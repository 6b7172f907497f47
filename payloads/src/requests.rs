use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const TASK_DESCRIPTION_MIN_LEN: usize = 10;
pub const SEARCH_QUERY_MIN_LEN: usize = 3;
pub const SEARCH_LIMIT_MAX: u32 = 100;
/// File extensions the backend accepts for knowledge base uploads.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// A user input problem caught before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("Search limit must be between 1 and 100")]
    LimitOutOfRange,
    #[error("Search threshold must be between 0 and 1")]
    ThresholdOutOfRange,
    #[error("Unsupported file type. Allowed: .pdf, .txt, .md")]
    UnsupportedFileType,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] =
        [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// A task for the agents to work on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    pub description: String,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Expected duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_agents: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub constraints: HashMap<String, Value>,
}

impl TaskRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_task_description(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub filters: HashMap<String, Value>,
    pub limit: u32,
    pub threshold: f64,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: HashMap::new(),
            limit: 10,
            threshold: 0.7,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_search_query(&self.query)?;
        if self.limit == 0 || self.limit > SEARCH_LIMIT_MAX {
            return Err(ValidationError::LimitOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ValidationError::ThresholdOutOfRange);
        }
        Ok(())
    }
}

/// Validate a task description.
///
/// Rules:
/// - Must not be blank
/// - At least 10 characters after trimming
pub fn validate_task_description(
    description: &str,
) -> Result<(), ValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::Required("Task description"));
    }
    if description.chars().count() < TASK_DESCRIPTION_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "Task description",
            min: TASK_DESCRIPTION_MIN_LEN,
        });
    }
    Ok(())
}

pub fn validate_search_query(query: &str) -> Result<(), ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::Required("Search query"));
    }
    if query.chars().count() < SEARCH_QUERY_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "Search query",
            min: SEARCH_QUERY_MIN_LEN,
        });
    }
    Ok(())
}

/// Check that a file name has an extension the backend will accept.
pub fn validate_upload_filename(
    file_name: &str,
) -> Result<(), ValidationError> {
    if file_name.trim().is_empty() {
        return Err(ValidationError::Required("File"));
    }
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(ValidationError::UnsupportedFileType)?;
    if ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFileType)
    }
}
