// Shared across the integration test binaries; each binary uses a subset
// of these helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use gitscribe_ai::MockGenerator;
use gitscribe_api::auth::jwt::{generate_access_token, JwtConfig};
use gitscribe_api::config::ServerConfig;
use gitscribe_api::routes;
use gitscribe_api::state::AppState;
use gitscribe_core::types::DbId;
use gitscribe_db::create_lazy_pool;
use gitscribe_db::memory::{MemoryQuotaStore, MemoryReadmeStore};
use gitscribe_packer::MockPacker;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// mock upstreams, and pipeline timeouts short enough that a hung mock
/// would fail the test run instead of stalling it.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        repo_packer_url: "http://localhost:8000".to_string(),
        repo_packer_token: String::new(),
        gemini_api_key: String::new(),
        gemini_model: "gemini-2.0-flash-001".to_string(),
        daily_limit_authenticated: 20,
        daily_limit_anonymous: 3,
        max_repo_tokens: 100_000,
        packer_timeout_secs: 5,
        generation_timeout_secs: 5,
        use_mock_responses: true,
    }
}

/// The app under test plus handles on its in-memory stores, so tests can
/// seed rows and assert on quota usage after requests complete.
pub struct TestApp {
    pub router: Router,
    pub quota: Arc<MemoryQuotaStore>,
    pub readmes: Arc<MemoryReadmeStore>,
}

/// Build the full application router with all middleware layers, backed by
/// in-memory stores and mock upstreams.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The database pool is lazy and
/// never connects; every handler goes through the store traits, which the
/// in-memory implementations satisfy.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let quota = Arc::new(MemoryQuotaStore::new());
    let readmes = Arc::new(MemoryReadmeStore::new());

    let pool = create_lazy_pool("postgres://127.0.0.1:1/gitscribe")
        .expect("lazy pool options should parse");

    let state = AppState {
        pool,
        config: Arc::new(config),
        quota: quota.clone(),
        readmes: readmes.clone(),
        packer: Arc::new(MockPacker),
        generator: Arc::new(MockGenerator::with_delay(Duration::ZERO)),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        router,
        quota,
        readmes,
    }
}

/// Mint a valid bearer token for the given user id, signed with the test
/// secret.
pub fn bearer_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET with no identity headers at all.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET as an anonymous caller behind a proxy (identified by IP).
pub async fn get_from_ip(app: Router, path: &str, ip: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body with no identity headers.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body as an anonymous caller identified by IP.
pub async fn post_json_from_ip(
    app: Router,
    path: &str,
    body: serde_json::Value,
    ip: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body with a bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PATCH a JSON body with no identity headers.
pub async fn patch_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PATCH a JSON body with a bearer token.
pub async fn patch_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect the response body as UTF-8 text. Used for NDJSON streams,
/// where the body is many JSON lines rather than one document.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
