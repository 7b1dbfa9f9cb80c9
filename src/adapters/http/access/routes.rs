//! HTTP routes for public proposal access endpoints.

use axum::{routing::post, Router};

use super::handlers::{countersign, request_code, verify_code, AccessHandlers};

/// Creates the public proposal access router with all endpoints.
pub fn access_routes(handlers: AccessHandlers) -> Router {
    Router::new()
        .route("/:id/access-code", post(request_code))
        .route("/:id/verify", post(verify_code))
        .route("/:id/countersign", post(countersign))
        .with_state(handlers)
}
