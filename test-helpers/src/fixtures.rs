//! Canned backend responses.
//!
//! Shared by the integration tests and the dev server so the UI can be
//! developed against the same data the tests assert on.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TASK_ID: &str = "task-2f1c";
pub const DOCUMENT_ID: &str = "doc-8a41";

pub fn task_status() -> Value {
    json!({
        "task_id": TASK_ID,
        "description": "Summarise Q3 competitor pricing changes",
        "status": "executing",
        "created_at": "2025-03-04T09:15:00",
        "updated_at": "2025-03-04T09:17:30.250000",
        "agents": [
            {
                "agent_id": "planner-1",
                "name": "Planner",
                "role": "planner",
                "status": "completed",
                "progress": 100.0,
                "capabilities": ["decomposition"],
                "tools_available": []
            },
            {
                "agent_id": "researcher-1",
                "name": "Researcher",
                "role": "researcher",
                "status": "executing",
                "progress": 45.0,
                "capabilities": ["search", "summarise"],
                "tools_available": ["knowledge_base"]
            }
        ],
        "progress": 0.45
    })
}

pub fn task_result() -> Value {
    json!({
        "task_id": TASK_ID,
        "status": "completed",
        "final_result": {
            "summary": "Two competitors cut list prices by 5 to 8 percent."
        },
        "agent_summaries": [],
        "knowledge_gaps": [
            { "area": "APAC pricing", "severity": "medium" }
        ],
        "execution_time": 42.5,
        "created_at": "2025-03-04T09:15:00",
        "completed_at": "2025-03-04T09:15:42",
        "overall_confidence": 0.82,
        "quality_score": 0.9
    })
}

pub fn task_list() -> Value {
    json!({ "tasks": [task_status()], "total_tasks": 1 })
}

pub fn document_metadata() -> Value {
    json!({
        "filename": "pricing-q3.pdf",
        "document_type": "pdf",
        "upload_date": "2025-03-01T16:02:11",
        "file_size": 482_133,
        "source_reliability": "high",
        "tags": ["pricing", "q3"],
        "description": "Quarterly pricing review",
        "author": null,
        "version": "1"
    })
}

pub fn document_list() -> Value {
    json!({ "documents": [document_metadata()] })
}

pub fn uploaded_document(filename: &str) -> Value {
    json!({
        "message": "Document uploaded successfully",
        "doc_id": DOCUMENT_ID,
        "filename": filename
    })
}

pub fn search_response() -> Value {
    json!({
        "query": "competitor pricing",
        "results": [
            {
                "document_id": DOCUMENT_ID,
                "content": "List prices for the enterprise tier dropped 8%...",
                "metadata": document_metadata(),
                "relevance_score": 0.91,
                "confidence": 0.87,
                "chunk_index": 3,
                "knowledge_areas": ["pricing"]
            }
        ],
        "total_results": 1,
        "suggestions": ["Upload APAC pricing sheets"]
    })
}

pub fn suggestion_list() -> Value {
    json!({
        "query": "pricing",
        "suggestions": [
            {
                "type": "document_upload",
                "description": "Add regional price lists",
                "priority": "high"
            },
            "Try narrowing the query to a single region"
        ],
        "total_suggestions": 2
    })
}

pub fn dashboard_overview() -> Value {
    json!({
        "timestamp": "2025-03-04T09:20:00",
        "system_metrics": {
            "total_agents": 4,
            "total_tasks": 12,
            "total_documents": 37,
            "system_uptime": "3 days",
            "memory_usage": "41%",
            "cpu_usage": "12%"
        },
        "recent_activity": [
            { "type": "task_completed", "task_id": TASK_ID }
        ],
        "performance_metrics": { "average_task_seconds": 38.2 },
        "knowledge_base_stats": { "chunks": 5120 },
        "overall_health": "healthy"
    })
}

pub fn system_health() -> Value {
    json!({
        "timestamp": "2025-03-04T09:20:00",
        "overall_health": "healthy",
        "agent_health": { "planner": "ok", "researcher": "ok" },
        "knowledge_base_health": { "status": "ok" },
        "recommendations": []
    })
}

pub fn health() -> Value {
    json!({ "status": "healthy", "service": "multi-agent-api", "version": "1.0.0" })
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("Access-Control-Allow-Origin", "*")
}

/// Mount every fixture on `server`, including a permissive CORS preflight
/// so a browser on another origin can talk to it.
pub async fn mount_all(server: &MockServer) {
    Mock::given(method("OPTIONS"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("Access-Control-Allow-Origin", "*")
                .insert_header("Access-Control-Allow-Methods", "*")
                .insert_header("Access-Control-Allow-Headers", "*"),
        )
        .mount(server)
        .await;

    let routes = [
        ("GET", "/health", health()),
        ("GET", "/api/v1/tasks/", task_list()),
        ("POST", "/api/v1/tasks/execute", task_result()),
        ("GET", "/api/v1/documents/", document_list()),
        ("POST", "/api/v1/documents/upload", uploaded_document("upload.pdf")),
        ("POST", "/api/v1/search/", search_response()),
        ("GET", "/api/v1/search/suggestions", suggestion_list()),
        ("GET", "/api/v1/enhanced-dashboard/overview", dashboard_overview()),
        ("GET", "/api/v1/enhanced-dashboard/health/status", system_health()),
    ];
    for (verb, route, body) in routes {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ok(body))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/tasks/[^/]+/status$"))
        .respond_with(ok(task_status()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/tasks/[^/]+/result$"))
        .respond_with(ok(task_result()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/v1/enhanced-tasks/[^/]+/(pause|resume)$"))
        .respond_with(ok(json!({ "message": "ok", "task_id": TASK_ID })))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v1/enhanced-tasks/[^/]+$"))
        .respond_with(ok(json!({ "message": "Task cancelled", "task_id": TASK_ID })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/documents/[^/]+$"))
        .respond_with(ok(document_metadata()))
        .mount(server)
        .await;
}
