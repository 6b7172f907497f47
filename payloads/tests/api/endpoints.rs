use payloads::requests::{SearchQuery, TaskPriority, TaskRequest};
use payloads::responses::AgentStatus;
use payloads::{DocumentId, TaskId};
use serde_json::json;
use test_helpers::{fixtures, spawn_backend, spawn_backend_with_fixtures};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn execute_task_posts_request() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tasks/execute"))
        .and(body_partial_json(json!({
            "description": "Compare vendor SLAs for storage",
            "priority": "high"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::task_result()),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut request = TaskRequest::new("Compare vendor SLAs for storage");
    request.priority = TaskPriority::High;
    let result = backend.client.execute_task(&request).await?;

    assert_eq!(result.status, AgentStatus::Completed);
    assert_eq!(result.task_id, TaskId::from(fixtures::TASK_ID));

    Ok(())
}

#[tokio::test]
async fn task_lifecycle_routes() -> anyhow::Result<()> {
    let backend = spawn_backend_with_fixtures().await;
    let id = TaskId::from(fixtures::TASK_ID);

    let status = backend.client.task_status(&id).await?;
    assert_eq!(status.agents.len(), 2);
    let result = backend.client.task_result(&id).await?;
    assert_eq!(result.knowledge_gaps.len(), 1);

    backend.client.pause_task(&id).await?;
    backend.client.resume_task(&id).await?;
    let cancelled = backend.client.cancel_task(&id).await?;
    assert_eq!(cancelled.task_id, Some(id));

    Ok(())
}

#[tokio::test]
async fn search_and_suggestions() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    fixtures::mount_all(&backend.server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search/suggestions"))
        .and(query_param("query", "pricing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::suggestion_list()),
        )
        .with_priority(1)
        .expect(1)
        .mount(&backend.server)
        .await;

    let response = backend
        .client
        .search(&SearchQuery::new("competitor pricing"))
        .await?;
    assert_eq!(response.total_results, 1);
    assert_eq!(response.results[0].metadata.filename, "pricing-q3.pdf");

    let suggestions = backend.client.search_suggestions("pricing").await?;
    assert_eq!(suggestions.total_suggestions, 2);

    Ok(())
}

#[tokio::test]
async fn dashboard_routes() -> anyhow::Result<()> {
    let backend = spawn_backend_with_fixtures().await;

    let overview = backend.client.dashboard_overview().await?;
    assert_eq!(overview.system_metrics.total_documents, 37);
    let health = backend.client.system_health().await?;
    assert_eq!(health.overall_health, "healthy");
    let document = backend
        .client
        .get_document(&DocumentId::from(fixtures::DOCUMENT_ID))
        .await?;
    assert_eq!(document.file_size, 482_133);

    Ok(())
}
