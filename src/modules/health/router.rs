use axum::Router;
use axum::routing::get;

use crate::state::AppState;

use super::controller::healthcheck;

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}
