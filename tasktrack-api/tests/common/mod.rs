/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Fresh in-memory database per test context
/// - Fast password hashing parameters
/// - Request builders carrying the API key and bearer token
/// - Signup helper returning a usable token

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use tasktrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasktrack_shared::{
    db::{pool::create_pool, schema::ensure_schema},
    repository::SqliteStore,
};
use tower::ServiceExt as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub state: AppState,
    pub app: Router,
    pub api_key: String,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_vars(&[]).await
    }

    /// Same as [`TestContext::new`] with extra configuration variables
    pub async fn with_vars(extra: &[(&str, &str)]) -> anyhow::Result<Self> {
        let api_key = Uuid::new_v4().to_string();

        let mut vars: HashMap<String, String> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", JWT_SECRET),
            ("API_KEY", api_key.as_str()),
            ("PASSWORD_MEMORY_KIB", "1024"),
            ("PASSWORD_ITERATIONS", "1"),
            ("PASSWORD_PARALLELISM", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let config = Config::from_lookup(|key| vars.get(key).cloned())?;

        let pool = create_pool(&config.database).await?;
        ensure_schema(&pool).await?;

        let state = AppState::new(SqliteStore::new(pool), config)?;
        let app = build_router(state.clone());

        Ok(TestContext {
            state,
            app,
            api_key,
        })
    }

    /// Builds a request carrying the API key and, optionally, a bearer token
    pub fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", &self.api_key);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Sends a request through the router and decodes the JSON body
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Signs up a user and returns their access token
    pub async fn signup(&self, username: &str, password: &str) -> String {
        let response = self
            .send(self.request(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            ))
            .await;

        assert_eq!(response.status, StatusCode::OK, "signup failed: {}", response.body);
        response.body["access_token"]
            .as_str()
            .expect("access_token should be a string")
            .to_string()
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, title: &str, description: &str) -> Value {
        let response = self
            .send(self.request(
                Method::POST,
                "/tasks/",
                Some(token),
                Some(serde_json::json!({ "title": title, "description": description })),
            ))
            .await;

        assert_eq!(response.status, StatusCode::OK, "create failed: {}", response.body);
        response.body
    }
}
