use axum::Router;
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use uuid::Uuid;

use waxstack::config::jwt::JwtConfig;
use waxstack::db::DbContext;
use waxstack::modules::auth::model::Identity;
use waxstack::router::init_router;
use waxstack::state::AppState;
use waxstack::utils::jwt::create_token;

#[allow(dead_code)]
pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: DbContext::new(pool),
        jwt_config: JwtConfig {
            signing_key: "integration-test-signing-key".to_string(),
            expiration_hours: 72,
        },
    }
}

#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

/// A valid bearer token for the demo identity.
#[allow(dead_code)]
pub fn auth_token(state: &AppState) -> String {
    let identity = Identity {
        id: "100".to_string(),
        name: "demo".to_string(),
    };
    create_token(&identity, &state.jwt_config).unwrap()
}

#[allow(dead_code)]
pub async fn seed_album(pool: &PgPool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO albums (id, name, created_at, updated_at) VALUES ($1, $2, NOW(), NOW())")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    id
}

#[allow(dead_code)]
pub async fn count_albums(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
