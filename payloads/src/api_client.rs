use crate::config::HEALTH_CHECK_TIMEOUT;
use crate::timer::{backoff_delay, sleep};
use crate::{
    ClientConfig, ClientError, DocumentId, TaskId, TokenStore, requests,
    responses,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// All REST endpoints live under this prefix.
pub const API_PREFIX: &str = "api/v1";
/// Liveness endpoint, relative to the backend origin.
pub const HEALTH_PATH: &str = "health";
/// Multipart field carrying uploaded files.
pub const UPLOAD_FIELD: &str = "file";
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
pub const CLIENT_VERSION_HEADER: &str = "X-Client-Version";
/// A timed-out request is retried at most this many times by the client
/// itself. Broader retry policies belong to the request hooks.
const TIMEOUT_RETRIES: u32 = 1;
#[cfg(not(target_arch = "wasm32"))]
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;
type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;
type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// An API client for interfacing with the backend.
///
/// Every request goes through here: headers are stamped uniformly, error
/// responses are classified, and timeouts get a single automatic retry.
#[derive(Clone)]
pub struct APIClient {
    config: ClientConfig,
    inner_client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl APIClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            config,
            inner_client: reqwest::Client::new(),
            tokens,
            on_unauthorized: None,
        }
    }

    /// Called after a 401 has cleared the stored token, typically to send
    /// the user to the login view.
    pub fn with_unauthorized_handler(
        mut self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth_token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn set_auth_token(&self, token: &str) {
        self.tokens.set(token);
    }

    pub fn clear_auth_token(&self) {
        self.tokens.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!(
            "{}/{API_PREFIX}/{}",
            self.config.base_url,
            path.trim_start_matches('/')
        )
    }

    fn health_url(&self) -> String {
        format!("{}/{HEALTH_PATH}", self.config.base_url)
    }

    /// Stamp the headers every outgoing request carries.
    fn prepare(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> RequestBuilder {
        let request_id = generate_request_id();
        tracing::debug!(request_id = %request_id, "Sending request");

        let request = request
            .timeout(timeout)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id)
            .header(CLIENT_VERSION_HEADER, &self.config.client_version);

        let request = match self.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request
    }

    /// Send a request built by `build`, retrying once if it times out.
    ///
    /// The request is rebuilt for each attempt so that it gets a fresh
    /// request id.
    async fn send(
        &self,
        build: impl Fn(&reqwest::Client) -> RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let mut retries = 0;
        loop {
            let request =
                self.prepare(build(&self.inner_client), self.config.timeout);
            let result: ReqwestResult = request.send().await;
            match result {
                Ok(response) => return Ok(response),
                Err(error) if error.is_timeout() && retries < TIMEOUT_RETRIES => {
                    let delay = backoff_delay(self.config.retry_delay, retries);
                    tracing::warn!(
                        "Request timed out, retrying in {}ms",
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    retries += 1;
                }
                Err(error) => {
                    tracing::debug!("Request failed without response: {error}");
                    return Err(ClientError::Transport(error));
                }
            }
        }
    }

    /// Deserialize a successful response, or classify and return the
    /// error response.
    async fn ok_body<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ClientError::from_response_body(status, &body);
            self.classify(&error);
            return Err(error);
        }
        response.json::<T>().await.map_err(|error| {
            if error.is_decode() {
                ClientError::Decode(error)
            } else {
                ClientError::Transport(error)
            }
        })
    }

    /// Side effects for application errors. Never alters the error.
    fn classify(&self, error: &ClientError) {
        let Some(status) = error.status() else {
            return;
        };
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Authentication failed, clearing stored token");
                self.tokens.clear();
                if let Some(on_unauthorized) = &self.on_unauthorized {
                    on_unauthorized();
                }
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!("Access forbidden: {error}");
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Rate limit exceeded: {error}");
            }
            status if status.as_u16() >= 500 => {
                tracing::error!("Server error {status}: {error}");
            }
            _ => {}
        }
    }
}

/// Generic verbs. Each returns the parsed response body on success.
impl APIClient {
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = self.format_url(path);
        let response = self
            .send(|client| {
                client.get(&url).header(CONTENT_TYPE, "application/json")
            })
            .await?;
        self.ok_body(response).await
    }

    pub async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.format_url(path);
        let response = self
            .send(|client| {
                client
                    .get(&url)
                    .query(query)
                    .header(CONTENT_TYPE, "application/json")
            })
            .await?;
        self.ok_body(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.format_url(path);
        let response = self.send(|client| client.post(&url).json(body)).await?;
        self.ok_body(response).await
    }

    async fn empty_post<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = self.format_url(path);
        let response = self
            .send(|client| {
                client.post(&url).header(CONTENT_TYPE, "application/json")
            })
            .await?;
        self.ok_body(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.format_url(path);
        let response = self.send(|client| client.put(&url).json(body)).await?;
        self.ok_body(response).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = self.format_url(path);
        let response = self
            .send(|client| {
                client.delete(&url).header(CONTENT_TYPE, "application/json")
            })
            .await?;
        self.ok_body(response).await
    }

    /// Upload a file as multipart form data under the `file` field.
    ///
    /// `on_progress` receives whole percentages in 0..=100. Natively the
    /// body is streamed in chunks and progress is reported per chunk; in
    /// the browser progress is reported as 0 before and 100 after the
    /// transfer.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        data: Vec<u8>,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<T, ClientError> {
        let url = self.format_url(path);
        let data: Arc<[u8]> = data.into();
        let on_progress: ProgressCallback = Arc::new(on_progress);
        let file_name = file_name.to_string();

        #[cfg(not(target_arch = "wasm32"))]
        let response = {
            if data.is_empty() {
                on_progress(upload_percent(0, 0));
            }
            self.send(|client| {
                let body = progress_body(data.clone(), on_progress.clone());
                let part = reqwest::multipart::Part::stream_with_length(
                    body,
                    data.len() as u64,
                )
                .file_name(file_name.clone());
                let form =
                    reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);
                client.post(&url).multipart(form)
            })
            .await?
        };

        #[cfg(target_arch = "wasm32")]
        let response = {
            on_progress(0);
            let response = self
                .send(|client| {
                    let part = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(file_name.clone());
                    let form =
                        reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);
                    client.post(&url).multipart(form)
                })
                .await?;
            let total = data.len() as u64;
            on_progress(upload_percent(total, total));
            response
        };

        self.ok_body(response).await
    }

    /// Returns true only for an HTTP 200 within five seconds. Never fails.
    pub async fn health_check(&self) -> bool {
        let request = self
            .prepare(self.inner_client.get(self.health_url()), HEALTH_CHECK_TIMEOUT);
        let result: ReqwestResult = request.send().await;
        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(error) => {
                tracing::debug!("Health check failed: {error}");
                false
            }
        }
    }
}

/// Methods on the backend API
impl APIClient {
    /// Run a task through the agent pipeline and wait for its result.
    pub async fn execute_task(
        &self,
        details: &requests::TaskRequest,
    ) -> Result<responses::TaskResult, ClientError> {
        self.post("tasks/execute", details).await
    }

    pub async fn task_status(
        &self,
        task_id: &TaskId,
    ) -> Result<responses::TaskStatus, ClientError> {
        self.get(&format!("tasks/{task_id}/status")).await
    }

    pub async fn task_result(
        &self,
        task_id: &TaskId,
    ) -> Result<responses::TaskResult, ClientError> {
        self.get(&format!("tasks/{task_id}/result")).await
    }

    pub async fn list_tasks(&self) -> Result<responses::TaskList, ClientError> {
        self.get("tasks/").await
    }

    pub async fn pause_task(
        &self,
        task_id: &TaskId,
    ) -> Result<responses::TaskActionResult, ClientError> {
        self.empty_post(&format!("enhanced-tasks/{task_id}/pause")).await
    }

    pub async fn resume_task(
        &self,
        task_id: &TaskId,
    ) -> Result<responses::TaskActionResult, ClientError> {
        self.empty_post(&format!("enhanced-tasks/{task_id}/resume")).await
    }

    pub async fn cancel_task(
        &self,
        task_id: &TaskId,
    ) -> Result<responses::TaskActionResult, ClientError> {
        self.delete(&format!("enhanced-tasks/{task_id}")).await
    }

    /// Add a document to the knowledge base.
    pub async fn upload_document(
        &self,
        file_name: &str,
        data: Vec<u8>,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<responses::UploadedDocument, ClientError> {
        self.upload("documents/upload", file_name, data, on_progress)
            .await
    }

    pub async fn list_documents(
        &self,
    ) -> Result<responses::DocumentList, ClientError> {
        self.get("documents/").await
    }

    pub async fn get_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<responses::DocumentMetadata, ClientError> {
        self.get(&format!("documents/{document_id}")).await
    }

    /// Search the knowledge base with natural language.
    pub async fn search(
        &self,
        query: &requests::SearchQuery,
    ) -> Result<responses::SearchResponse, ClientError> {
        self.post("search/", query).await
    }

    pub async fn search_suggestions(
        &self,
        query: &str,
    ) -> Result<responses::SuggestionList, ClientError> {
        self.get_with_query("search/suggestions", &[("query", query)])
            .await
    }

    pub async fn dashboard_overview(
        &self,
    ) -> Result<responses::DashboardOverview, ClientError> {
        self.get("enhanced-dashboard/overview").await
    }

    pub async fn system_health(
        &self,
    ) -> Result<responses::SystemHealth, ClientError> {
        self.get("enhanced-dashboard/health/status").await
    }
}

/// A tracing id of the form `req_<unix millis>_<9 random chars>`.
pub fn generate_request_id() -> String {
    let millis = jiff::Timestamp::now().as_millisecond();
    let suffix: String =
        Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("req_{millis}_{suffix}")
}

/// Percentage of an upload that has been sent, rounded to the nearest
/// whole number and clamped to 0..=100. An empty upload is complete.
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = sent.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// A request body that reports progress as each chunk is handed to the
/// transport.
#[cfg(not(target_arch = "wasm32"))]
fn progress_body(data: Arc<[u8]>, on_progress: ProgressCallback) -> reqwest::Body {
    let total = data.len() as u64;
    let chunks: Vec<Vec<u8>> =
        data.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        on_progress(upload_percent(sent, total));
        Ok::<_, std::io::Error>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}
