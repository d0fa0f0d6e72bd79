/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::{build_router, AppState}, config::Config};
/// use tasktrack_shared::{db::{pool::create_pool, schema::ensure_schema}, repository::SqliteStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// ensure_schema(&pool).await?;
/// let state = AppState::new(SqliteStore::new(pool), config)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{api_key::api_key_layer, session::session_layer},
    routes,
};
use anyhow::Context;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tasktrack_shared::{
    auth::{api_key::ApiKeyGate, jwt::TokenService, password::PasswordHasher},
    repository::SqliteStore,
    services::{auth::AuthService, tasks::TaskService},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Persistent store
    pub store: SqliteStore,

    /// Token issuance and validation
    pub tokens: Arc<TokenService>,

    /// `X-API-Key` check
    pub api_key_gate: ApiKeyGate,

    /// Signup and login
    pub auth: AuthService,

    /// Task operations
    pub tasks: TaskService,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Returns an error if any configured auth setting is rejected.
    pub fn new(store: SqliteStore, config: Config) -> anyhow::Result<Self> {
        let ttl = chrono::Duration::try_minutes(config.jwt.access_token_expire_minutes)
            .context("access token lifetime is out of range")?;
        let tokens = Arc::new(TokenService::new(&config.jwt.secret, config.jwt.algorithm, ttl)?);
        let hasher = Arc::new(PasswordHasher::new(config.password)?);
        let api_key_gate = ApiKeyGate::new(&config.api.api_key);

        let auth = AuthService::new(Arc::new(store.clone()), hasher, Arc::clone(&tokens))?;
        let tasks = TaskService::new(Arc::new(store.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            api_key_gate,
            auth,
            tasks,
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                 # Health check (public)
/// ├── /auth/                      # API key
/// │   ├── POST /signup
/// │   ├── POST /token
/// │   └── GET  /users             # only with DEBUG_ROUTES=true
/// └── /tasks/                     # API key + bearer token
///     ├── POST   /
///     ├── GET    /
///     ├── GET    /:task_id
///     ├── PUT    /:task_id
///     └── DELETE /:task_id
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Logging (tower-http TraceLayer)
/// 2. API key gate (every path under `/auth` and `/tasks`, matched or not)
/// 3. Session resolution (`/tasks`)
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (API key only)
    let mut auth_routes = Router::new()
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/token", post(routes::auth::login));

    if state.config.api.debug_routes {
        tracing::warn!("Debug routes enabled: GET /auth/users lists every account");
        auth_routes = auth_routes.route("/auth/users", get(routes::auth::list_users));
    }

    // Task routes (API key + bearer token)
    let task_routes = Router::new()
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(from_fn_with_state(state.clone(), session_layer));

    // Combine all routes with middleware stack; the API key gate wraps the
    // fallback too, so unknown paths under /auth and /tasks are rejected first
    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(task_routes)
        .layer(from_fn_with_state(state.clone(), api_key_layer))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
