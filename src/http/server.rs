//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the public endpoints
//! - Wire up middleware (tracing, request timeout, correlation/audit)
//! - Bind server to listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware::from_fn_with_state,
    routing::{get, post},
    BoxError, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::middleware::{correlation_middleware, CorrelationState};
use crate::http::response::GatewayError;
use crate::observability::AuditLog;
use crate::upstream::{ClientInitError, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub page_size: u32,
}

/// Errors while assembling the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Upstream(#[from] ClientInitError),

    #[error("cannot open audit log '{path}': {source}")]
    AuditLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server, opening the audit log if enabled.
    pub async fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let audit = if config.audit.enabled {
            AuditLog::open(&config.audit.path)
                .await
                .map_err(|source| StartupError::AuditLog {
                    path: config.audit.path.clone(),
                    source,
                })?
        } else {
            tracing::info!("Audit log disabled");
            AuditLog::disabled()
        };

        Self::with_audit_log(config, Arc::new(audit))
    }

    /// Create a server around an already opened audit log.
    pub fn with_audit_log(config: GatewayConfig, audit: Arc<AuditLog>) -> Result<Self, StartupError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstreams, &config.timeouts)?,
            page_size: config.pagination.page_size,
        };
        if config.audit.fail_closed && !audit.is_enabled() {
            tracing::warn!("audit.fail_closed has no effect while auditing is disabled");
        }
        let correlation = CorrelationState::new(audit, config.audit.fail_closed);

        let router = Self::build_router(&config, state, correlation);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: trace → correlation → timeout → handler.
    fn build_router(config: &GatewayConfig, state: AppState, correlation: CorrelationState) -> Router {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        Router::new()
            .route("/news/latest", get(handlers::latest))
            .route("/news/filter", get(handlers::filter))
            .route("/news/detailed", get(handlers::detailed))
            .route("/comments/store", post(handlers::store_comment))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                        request_failed(err, request_timeout)
                    }))
                    .timeout(request_timeout),
            )
            .layer(from_fn_with_state(correlation, correlation_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            news = %self.config.upstreams.news,
            comments = %self.config.upstreams.comments,
            moderation = %self.config.upstreams.moderation,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render a failure of the request timeout stack as a plain-text 500.
fn request_failed(err: BoxError, limit: Duration) -> GatewayError {
    if err.is::<Elapsed>() {
        GatewayError::Internal(format!("request exceeded {}s time limit", limit.as_secs()))
    } else {
        GatewayError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::Request,
        http::{header, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    async fn slow_news(delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/news/{page}/{size}",
            get(move || async move {
                tokio::time::sleep(delay).await;
                r#"{"Count": 0, "Posts": []}"#
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config_for(news: &str) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.upstreams.news = news.to_string();
        config.audit.enabled = false;
        config
    }

    async fn get_path(server: &GatewayServer, uri: &str) -> Response {
        server
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_router_serves_latest() {
        let news = slow_news(Duration::ZERO).await;
        let server = GatewayServer::new(config_for(&news)).await.unwrap();

        let response = get_path(&server, "/news/latest?page=3").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"CurrentPage\":3"), "{}", body);
    }

    #[tokio::test]
    async fn test_request_time_limit_renders_plain_text_500() {
        let news = slow_news(Duration::from_millis(2_500)).await;
        let mut config = config_for(&news);
        config.timeouts.request_secs = 1;
        config.timeouts.upstream_ms = 5_000;
        let server = GatewayServer::new(config).await.unwrap();

        let response = get_path(&server, "/news/latest").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(
            body_string(response).await,
            "internal error: request exceeded 1s time limit\n"
        );
    }

    #[test]
    fn test_other_stack_errors_are_internal() {
        let err = request_failed("boom".into(), Duration::from_secs(1));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal error: boom");
    }
}
