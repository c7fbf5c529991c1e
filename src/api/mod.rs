//! HTTP surface over the flow orchestrator.
//!
//! Three routes map one-to-one onto the orchestrator's operations; everything
//! else (request ids, tracing spans, OpenAPI docs, graceful shutdown) is
//! plumbing around them.

pub mod handlers;
mod openapi;

pub use openapi::ApiDoc;

use crate::{broker::spawn_sweeper, login::LoginService};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the application router around a login service.
#[must_use]
pub fn router(service: Arc<LoginService>) -> Router {
    let registry = Arc::clone(service.registry());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/v1/login", post(handlers::login::start))
        .route("/v1/login/answer", post(handlers::login::answer))
        .route("/v1/login/:account_id", get(handlers::login::state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(service))
                .layer(Extension(registry)),
        )
}

/// Start the server and run until ctrl-c, then stop the sweeper.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(port: u16, service: Arc<LoginService>) -> Result<()> {
    let sweeper = spawn_sweeper(Arc::clone(service.registry()), &service.config());

    let app = router(service);
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    sweeper.shutdown().await;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
