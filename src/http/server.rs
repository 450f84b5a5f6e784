//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (panics, request ID, tracing, CORS, headers, limits)
//! - Serve on a listener until shutdown
//!
//! The router is also exposed on its own for hosts that run it without a
//! local listener.

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::context::AppContext;
use crate::http::handlers;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{internal_error, request_timeout};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// HTTP server for the transfer API.
pub struct HttpServer {
    router: Router,
    context: Arc<AppContext>,
}

impl HttpServer {
    pub fn new(context: Arc<AppContext>) -> Self {
        let router = Self::build_router(context.clone());
        Self { router, context }
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(context: Arc<AppContext>) -> Router {
        let config = context.config();

        let mut routes = Router::new()
            .route("/health", get(handlers::health))
            .route("/balance/{address}", get(handlers::balance));
        if !config.runtime.production {
            routes = routes.route("/debug", get(handlers::debug));
        }

        // Transfers are not bounded by the request timeout: once the token
        // transaction is broadcast the native leg must still be sent.
        let routes = routes
            .route_layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .route("/transfer", post(handlers::transfer));

        let layers = ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id(req),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(CorsLayer::permissive())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_static("max-age=15552000; includeSubDomains"),
            ))
            .layer(middleware::map_response(timeout_as_json));

        routes
            .route_layer(middleware::from_fn(track_metrics))
            .method_not_allowed_fallback(handlers::fallback)
            .fallback(handlers::fallback)
            .with_state(context)
            .layer(layers)
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            init_mode = ?self.context.init_mode(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Per-route request counters and latency.
async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}

/// Timeout responses carry no body; give them the JSON error shape.
async fn timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return request_timeout();
    }
    response
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %message, "Handler panicked");
    internal_error(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_bare_timeout_becomes_json() {
        let response = timeout_as_json(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "request timeout");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = timeout_as_json(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!response.headers().contains_key(header::CONTENT_TYPE));
    }
}
