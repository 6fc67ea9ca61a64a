use axum::routing::get;
use axum::{Router, middleware};

use crate::db::transaction_middleware;
use crate::state::AppState;

use super::controller::{create_album, delete_album, get_album, list_albums, update_album};

/// Album routes. The whole group runs inside a request-scoped transaction;
/// reads are unaffected and writes spanning several service calls share it.
pub fn init_albums_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_albums).post(create_album))
        .route(
            "/{id}",
            get(get_album).put(update_album).delete(delete_album),
        )
        .route_layer(middleware::from_fn_with_state(state, transaction_middleware))
}
