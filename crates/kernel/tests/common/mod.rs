#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! The router is the real one from `routes::app`. [`TestApp::new`] uses a
//! pool that connects lazily, so requests rejected before any query
//! (unknown language, failed validation, missing admin token) run without a
//! database. [`shared_app`] connects to `DATABASE_URL`, applies migrations
//! and is shared by every storage-backed test.
//!
//! ## Runtime Safety
//!
//! The shared `TestApp` lives on a long-lived Tokio runtime that outlives
//! any individual test, and storage-backed tests run on it via [`run_test`]
//! so pooled connections never outlive the runtime that opened them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vitrine_kernel::config::Config;
use vitrine_kernel::db;
use vitrine_kernel::routes;
use vitrine_kernel::state::AppState;

/// Token configured on the admin surface of every [`TestApp`].
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Database used when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/vitrine_test";

/// Shared Tokio runtime that outlives all individual test runtimes.
pub static SHARED_RT: std::sync::LazyLock<tokio::runtime::Runtime> =
    std::sync::LazyLock::new(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build shared test runtime")
    });

/// Global connected test app, initialized once on the shared runtime.
static SHARED_APP: std::sync::OnceLock<TestApp> = std::sync::OnceLock::new();

/// Get a reference to the shared, database-backed [`TestApp`].
pub async fn shared_app() -> &'static TestApp {
    SHARED_APP.get_or_init(|| {
        // Initialize on a separate OS thread to avoid a nested block_on.
        let handle = SHARED_RT.handle().clone();
        std::thread::spawn(move || handle.block_on(TestApp::connected()))
            .join()
            .expect("TestApp init thread panicked")
    })
}

/// Run an async test body on [`SHARED_RT`].
pub fn run_test<F: std::future::Future<Output = ()> + Send>(f: F) {
    SHARED_RT.block_on(f);
}

/// A title no other test (or earlier run) has used.
pub fn unique(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = chrono::Utc::now().timestamp_micros();
    format!("{prefix} {stamp} {n}")
}

/// Configuration pointing at a database that is never reached.
pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: DEFAULT_DATABASE_URL.to_string(),
        database_max_connections: 1,
        media_url: "/media/".to_string(),
        languages: "en:English,tr:Turkish".parse().expect("valid languages"),
        cors_allowed_origins: vec!["*".to_string()],
        admin_token: Some(ADMIN_TOKEN.to_string()),
    }
}

/// Test application wrapping the real kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Build the app on a lazily connecting pool.
    pub fn new() -> Self {
        let config = test_config();
        let pool = db::create_lazy_pool(&config).expect("Failed to create lazy pool");
        let state = AppState::from_parts(pool, &config);
        let router = routes::app(state.clone());
        Self { router, state }
    }

    /// Connect to the test database and apply migrations.
    pub async fn connected() -> Self {
        dotenvy::dotenv().ok();

        let mut config = test_config();
        config.database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        config.database_max_connections = 10;

        let state = AppState::new(&config)
            .await
            .expect("Failed to initialize AppState");
        let router = routes::app(state.clone());
        Self { router, state }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    /// GET without credentials.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Admin request carrying the configured bearer token.
    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.admin_with_token(method, uri, body, Some(ADMIN_TOKEN))
            .await
    }

    /// Admin request with an explicit (or missing) bearer token.
    pub async fn admin_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(request).await
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
