mod endpoints;
mod headers;
mod timeout;
mod upload;

use test_helpers::{spawn_backend, spawn_backend_with_fixtures};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let backend = spawn_backend_with_fixtures().await;

    assert!(backend.client.health_check().await);

    Ok(())
}

#[tokio::test]
async fn health_check_requires_200() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&backend.server)
        .await;

    assert!(!backend.client.health_check().await);

    Ok(())
}

#[tokio::test]
async fn health_check_swallows_server_errors() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend.server)
        .await;

    assert!(!backend.client.health_check().await);
    assert_eq!(backend.login_redirects(), 0);

    Ok(())
}

#[tokio::test]
async fn health_check_swallows_connection_errors() -> anyhow::Result<()> {
    let client = test_helpers::unreachable_client()?;

    assert!(!client.health_check().await);

    Ok(())
}
