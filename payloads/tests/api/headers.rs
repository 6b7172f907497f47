use payloads::api_client::{CLIENT_VERSION_HEADER, REQUEST_ID_HEADER};
use payloads::responses::TaskList;
use test_helpers::{fixtures, spawn_backend};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn every_request_is_stamped() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    let version = backend.client.config().client_version.clone();
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .and(header_exists(REQUEST_ID_HEADER))
        .and(header(CLIENT_VERSION_HEADER, version.as_str()))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::task_list()))
        .expect(2)
        .mount(&backend.server)
        .await;

    let tasks: TaskList = backend.client.list_tasks().await?;
    assert_eq!(tasks.total_tasks, 1);
    backend.client.list_tasks().await?;

    // Each request carries its own id.
    let requests = backend.server.received_requests().await.unwrap_or_default();
    let ids: Vec<String> = requests
        .iter()
        .filter_map(|r| r.headers.get(REQUEST_ID_HEADER))
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    for id in &ids {
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3, "{id}");
        assert_eq!(parts[0], "req");
        assert!(parts[1].parse::<i64>().is_ok(), "{id}");
        assert_eq!(parts[2].len(), 9, "{id}");
    }

    Ok(())
}

#[tokio::test]
async fn bearer_token_attached_when_present() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::document_list()),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    backend.client.set_auth_token("secret-token");
    assert!(backend.client.is_authenticated());
    let documents = backend.client.list_documents().await?;
    assert_eq!(documents.documents.len(), 1);

    Ok(())
}

#[tokio::test]
async fn no_authorization_without_token() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::document_list()),
        )
        .mount(&backend.server)
        .await;

    backend.client.list_documents().await?;

    let requests = backend.server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("Authorization").is_none());

    Ok(())
}
