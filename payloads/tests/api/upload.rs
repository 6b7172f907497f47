use payloads::DocumentId;
use std::sync::{Arc, Mutex};
use test_helpers::{fixtures, spawn_backend};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_upload(backend: &test_helpers::TestBackend) {
    Mock::given(method("POST"))
        .and(path("/api/v1/documents/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::uploaded_document("notes.md")),
        )
        .expect(1)
        .mount(&backend.server)
        .await;
}

#[tokio::test]
async fn upload_reports_progress_to_completion() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mount_upload(&backend).await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let data = vec![b'x'; 300 * 1024];

    let uploaded = backend
        .client
        .upload_document("notes.md", data, move |percent| {
            sink.lock().unwrap().push(percent)
        })
        .await?;

    assert_eq!(uploaded.filename, "notes.md");
    assert_eq!(uploaded.doc_id, DocumentId::from(fixtures::DOCUMENT_ID));

    let seen = seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| *p <= 100));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&100));

    Ok(())
}

#[tokio::test]
async fn upload_uses_file_field() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mount_upload(&backend).await;

    backend
        .client
        .upload_document("notes.md", b"# Notes".to_vec(), |_| {})
        .await?;

    let requests = backend.server.received_requests().await.unwrap_or_default();
    let content_type = requests[0]
        .headers
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="notes.md""#));
    assert!(body.contains("# Notes"));

    Ok(())
}

#[tokio::test]
async fn empty_upload_reports_complete() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mount_upload(&backend).await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    backend
        .client
        .upload_document("empty.txt", Vec::new(), move |percent| {
            sink.lock().unwrap().push(percent)
        })
        .await?;

    assert_eq!(seen.lock().unwrap().last(), Some(&100));

    Ok(())
}
