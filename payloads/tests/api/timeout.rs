use payloads::ClientError;
use std::time::Duration;
use test_helpers::{fixtures, spawn_backend, test_config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn timeout_is_retried_exactly_once() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::task_list())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&backend.server)
        .await;
    let client = backend.client_with(payloads::ClientConfig {
        timeout: Duration::from_millis(200),
        retry_delay: Duration::from_millis(50),
        ..test_config()
    });

    let error = client.list_tasks().await.unwrap_err();

    assert!(matches!(error, ClientError::Transport(_)), "{error:?}");
    assert!(error.is_timeout());
    assert_eq!(
        error.to_string(),
        "The request timed out. Please try again."
    );
    let requests = backend.server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);

    Ok(())
}

#[tokio::test]
async fn slow_but_in_time_succeeds() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::task_list())
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&backend.server)
        .await;

    let tasks = backend.client.list_tasks().await?;
    assert_eq!(tasks.tasks.len(), 1);

    Ok(())
}
