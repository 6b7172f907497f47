//! Response bodies returned by the backend.
//!
//! The backend emits naive ISO-8601 timestamps (no offset), so they are
//! modelled as [`jiff::civil::DateTime`].

use crate::{DocumentId, TaskId};
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Planning,
    Executing,
    Completed,
    Failed,
    Paused,
}

impl AgentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Executing => "Executing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Paused => "Paused",
        }
    }

    /// True once the task will not change state on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub status: AgentStatus,
    /// Percentage, 0 to 100.
    pub progress: f64,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub tools_available: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub description: String,
    pub status: AgentStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(default)]
    pub agents: Vec<AgentInfo>,
    /// Fraction complete, 0 to 1.
    pub progress: f64,
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub estimated_completion: Option<DateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub status: AgentStatus,
    pub final_result: Map<String, Value>,
    #[serde(default)]
    pub agent_summaries: Vec<Map<String, Value>>,
    #[serde(default)]
    pub knowledge_gaps: Vec<Map<String, Value>>,
    /// Seconds.
    pub execution_time: f64,
    pub created_at: DateTime,
    pub completed_at: DateTime,
    pub overall_confidence: f64,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<TaskStatus>,
    pub total_tasks: usize,
}

/// Acknowledgement for pause / resume / cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskActionResult {
    pub message: String,
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Report,
    Presentation,
    Spreadsheet,
    Text,
    Pdf,
    Image,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    #[serde(default)]
    pub document_type: DocumentType,
    pub upload_date: DateTime,
    /// Bytes.
    #[serde(default)]
    pub file_size: u64,
    #[serde(default = "default_reliability")]
    pub source_reliability: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

fn default_reliability() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub message: String,
    pub doc_id: DocumentId,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document_id: DocumentId,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub relevance_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub chunk_index: Option<u32>,
    #[serde(default)]
    pub knowledge_areas: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentType {
    DocumentUpload,
    AdditionalSources,
    DocumentDiversity,
    ExternalIntegration,
    UserFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSuggestion {
    #[serde(rename = "type")]
    pub kind: EnrichmentType,
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub expected_impact: Option<String>,
    #[serde(default)]
    pub related_queries: Vec<String>,
}

/// Suggestions are free text in some backend versions and structured in
/// others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Enrichment(EnrichmentSuggestion),
    Text(String),
}

impl Suggestion {
    pub fn text(&self) -> &str {
        match self {
            Self::Enrichment(e) => &e.description,
            Self::Text(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub total_suggestions: usize,
}

/// Counters shown on the dashboard landing view. Every field is optional
/// on the wire; the backend returns an empty object when collection fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    pub total_agents: u64,
    pub total_tasks: u64,
    pub total_documents: u64,
    pub system_uptime: Option<String>,
    pub memory_usage: Option<String>,
    pub cpu_usage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub timestamp: DateTime,
    #[serde(default)]
    pub system_metrics: SystemMetrics,
    #[serde(default)]
    pub recent_activity: Vec<Map<String, Value>>,
    #[serde(default)]
    pub performance_metrics: Map<String, Value>,
    #[serde(default)]
    pub knowledge_base_stats: Map<String, Value>,
    pub overall_health: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub timestamp: DateTime,
    pub overall_health: String,
    #[serde(default)]
    pub agent_health: Map<String, Value>,
    #[serde(default)]
    pub knowledge_base_health: Map<String, Value>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Body of the root `/health` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
