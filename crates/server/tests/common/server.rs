//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use folio_core::config::AppConfig;
use folio_registry::SqliteStore;
use folio_registry::store::RegistryStore;
use folio_server::{AppState, create_router};
use folio_storage::{FilesystemBackend, ObjectStore};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage and registry.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let storage: Arc<dyn ObjectStore> = Arc::new(
            FilesystemBackend::new(temp_dir.path().join("store"))
                .await
                .expect("Failed to create storage backend"),
        );
        let registry: Arc<dyn RegistryStore> = Arc::new(
            SqliteStore::new(temp_dir.path().join("registry.db"))
                .await
                .expect("Failed to create registry"),
        );

        Self::with_parts(storage, registry, temp_dir)
    }

    /// Create a test server around pre-built (possibly fault-injecting)
    /// backends.
    pub fn with_parts(
        storage: Arc<dyn ObjectStore>,
        registry: Arc<dyn RegistryStore>,
        temp_dir: TempDir,
    ) -> Self {
        let config = AppConfig::for_testing(temp_dir.path());
        let state = AppState::new(config, storage, registry);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Create a parent via the API and return its id.
    pub async fn create_parent(&self, plan_tier: &str) -> Uuid {
        let (status, body) = self
            .json_request(
                "POST",
                "/v1/parents",
                Some(serde_json::json!({
                    "owner_id": Uuid::new_v4(),
                    "plan_tier": plan_tier,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create parent failed: {body}");
        Uuid::parse_str(body["parent_id"].as_str().unwrap()).unwrap()
    }

    /// Upload raw bytes as an asset. Returns status and response body.
    pub async fn upload(
        &self,
        parent_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
        primary: bool,
    ) -> (StatusCode, Value) {
        let uri = format!("/v1/parents/{parent_id}/assets?primary={primary}&filename=photo.png");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", content_type)
            .body(Body::from(bytes))
            .unwrap();
        self.send(request).await
    }

    /// List a parent's assets, asserting success.
    pub async fn list_assets(&self, parent_id: Uuid) -> Vec<Value> {
        let (status, body) = self
            .json_request("GET", &format!("/v1/parents/{parent_id}/assets"), None)
            .await;
        assert_eq!(status, StatusCode::OK, "list assets failed: {body}");
        body["assets"].as_array().unwrap().clone()
    }

    /// Fetch a parent record, asserting success.
    pub async fn get_parent(&self, parent_id: Uuid) -> Value {
        let (status, body) = self
            .json_request("GET", &format!("/v1/parents/{parent_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK, "get parent failed: {body}");
        body
    }

    /// Make a JSON request against the router.
    pub async fn json_request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
