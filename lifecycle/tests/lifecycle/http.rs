use lifecycle::{Phase, Request, RequestOptions, RetryPolicy};
use payloads::responses::TaskList;
use payloads::ClientError;
use std::time::Duration;
use test_helpers::{fixtures, spawn_backend};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn list_tasks(
    client: payloads::APIClient,
    retry_count: u32,
) -> Request<(), TaskList, ClientError> {
    Request::new(
        move |()| {
            let client = client.clone();
            async move { client.list_tasks().await }
        },
        RequestOptions::default()
            .retry(RetryPolicy::new(retry_count, Duration::from_millis(10))),
    )
}

#[tokio::test]
async fn server_errors_are_retried_until_success() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::task_list()),
        )
        .mount(&backend.server)
        .await;
    let request = list_tasks(backend.client.clone(), 3);

    request.execute(()).await;

    assert_eq!(request.phase(), Phase::Succeeded);
    assert_eq!(request.state().data.map(|t| t.total_tasks), Some(1));
    let received = backend.server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 3);
    Ok(())
}

#[tokio::test]
async fn not_found_is_not_retried() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "detail": "Task not found" })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
    let request = list_tasks(backend.client.clone(), 3);

    request.execute(()).await;

    assert_eq!(request.phase(), Phase::Failed);
    assert_eq!(request.state().error.as_deref(), Some("Task not found"));
    Ok(())
}

#[tokio::test]
async fn malformed_response_is_not_retried() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .expect(1)
        .mount(&backend.server)
        .await;
    let request = list_tasks(backend.client.clone(), 3);

    request.execute(()).await;

    assert_eq!(
        request.state().error.as_deref(),
        Some("Unexpected response from server.")
    );
    Ok(())
}
