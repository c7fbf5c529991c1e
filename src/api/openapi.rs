//! OpenAPI document for the broker surface.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(description = "Challenge-based login handshake broker"),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::login::start,
        crate::api::handlers::login::answer,
        crate::api::handlers::login::state,
    ),
    tags(
        (name = "login", description = "Challenge-based login flow"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
