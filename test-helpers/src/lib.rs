pub mod fixtures;
pub mod telemetry;

use payloads::{APIClient, ClientConfig, ClientError, MemoryTokenStore, StatusCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::MockServer;

/// A mock backend plus a client pointed at it.
pub struct TestBackend {
    pub server: MockServer,
    pub client: APIClient,
    pub tokens: Arc<MemoryTokenStore>,
    redirects: Arc<AtomicUsize>,
}

impl TestBackend {
    /// How many times the client asked to be sent to the login view.
    pub fn login_redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// A second client sharing this backend, built from `config`. The base
    /// URL is replaced with the mock server's.
    pub fn client_with(&self, config: ClientConfig) -> APIClient {
        let redirects = self.redirects.clone();
        APIClient::new(config.with_base_url(self.uri()), self.tokens.clone())
            .with_unauthorized_handler(move || {
                redirects.fetch_add(1, Ordering::SeqCst);
            })
    }
}

/// Timeouts and delays short enough for tests against a local server.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        timeout: Duration::from_secs(2),
        retry_delay: Duration::from_millis(10),
        ..ClientConfig::default()
    }
}

/// Start an empty mock backend. Tests mount the responses they need.
pub async fn spawn_backend() -> TestBackend {
    init_test_logging();

    let server = MockServer::start().await;
    let tokens = Arc::new(MemoryTokenStore::new());
    let redirects = Arc::new(AtomicUsize::new(0));

    let counter = redirects.clone();
    let client = APIClient::new(
        test_config().with_base_url(server.uri()),
        tokens.clone(),
    )
    .with_unauthorized_handler(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    TestBackend {
        server,
        client,
        tokens,
        redirects,
    }
}

/// Start a mock backend with every fixture mounted.
pub async fn spawn_backend_with_fixtures() -> TestBackend {
    let backend = spawn_backend().await;
    fixtures::mount_all(&backend.server).await;
    backend
}

/// A client whose backend refuses every connection.
pub fn unreachable_client() -> anyhow::Result<APIClient> {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")?
        .local_addr()?
        .port();
    Ok(APIClient::new(
        test_config().with_base_url(format!("http://127.0.0.1:{port}")),
        Arc::new(MemoryTokenStore::new()),
    ))
}

fn init_test_logging() {
    let subscriber = telemetry::get_subscriber("error".into());
    // Only the first test in a binary installs the subscriber.
    let _ = telemetry::init_subscriber(subscriber);
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::Application { status, .. }) => {
            assert_eq!(status, expected)
        }
        Err(other) => panic!("Expected application error, got {other:?}"),
        Ok(_) => panic!("Expected application error, got success"),
    };
}
