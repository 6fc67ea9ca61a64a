use axum::routing::post;
use axum::Router;

use crate::state::AppState;

use super::controller::login;

pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
