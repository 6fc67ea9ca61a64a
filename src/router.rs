use axum::http::StatusCode;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::access_log_middleware;
use crate::middleware::recovery::recovery_layer;
use crate::modules::albums::init_albums_router;
use crate::modules::auth::init_auth_router;
use crate::modules::health::init_health_router;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/v1",
            Router::new()
                .nest("/albums", init_albums_router(state.clone()))
                .merge(init_auth_router()),
        )
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        // Layer order is inside-out: CORS closest to the routes, panic
        // recovery outside it, the access log outermost.
        .layer(CorsLayer::permissive())
        .layer(recovery_layer())
        .layer(middleware::from_fn(access_log_middleware))
}

/// Unmatched paths surface the standard not-found envelope.
async fn fallback() -> AppError {
    AppError::not_found()
}

/// Matched paths with an unsupported method surface a 405 envelope.
async fn method_not_allowed() -> AppError {
    AppError::with_status(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
