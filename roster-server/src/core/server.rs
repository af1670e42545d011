//! Server Implementation
//!
//! HTTP 服务器启动和管理

use axum::Router;
use axum::middleware as axum_middleware;
use http::HeaderValue;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth;
use crate::core::{Config, ServerState};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
fn build_router() -> Router<ServerState> {
    Router::new()
        // Public routes: health check, login, bot webhook
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::bot::router())
        // Resource APIs - authentication required
        .merge(crate::api::cafes::router())
        .merge(crate::api::staff::router())
        .merge(crate::api::shifts::router())
        .merge(crate::api::reservations::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router {
    let request_id_header = http::HeaderName::from_static("x-request-id");

    build_router()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(TraceLayer::new_for_http())
        // Request ID - generated first, propagated to the response
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, XRequestId))
        .with_state(state.clone())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests and embedding)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app(&state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("☕ Roster Server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
