mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::{auth_token, body_json, seed_album, setup_test_app, test_state};
use waxstack::router::init_router;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn get_album_returns_album(pool: PgPool) {
    let id = seed_album(&pool, "Abbey Road").await;
    let app = setup_test_app(pool);

    let response = app.oneshot(get(&format!("/v1/albums/{id}"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], json!(id.to_string()));
    assert_eq!(body["name"], "Abbey Road");
}

#[sqlx::test(migrations = "./migrations")]
async fn get_missing_album_returns_not_found_envelope(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app
        .oneshot(get(&format!("/v1/albums/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "The requested resource was not found.");
}

#[sqlx::test(migrations = "./migrations")]
async fn get_album_with_malformed_id_returns_not_found(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app.oneshot(get("/v1/albums/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "The requested resource was not found.");
}

#[sqlx::test(migrations = "./migrations")]
async fn list_albums_paginates(pool: PgPool) {
    for i in 0..5 {
        seed_album(&pool, &format!("Album {i}")).await;
    }
    let app = setup_test_app(pool);

    let response = app
        .oneshot(get("/v1/albums?page=2&per_page=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let link = response
        .headers()
        .get(header::LINK)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(link.contains("</v1/albums?page=1&per_page=2>; rel=\"first\""));
    assert!(link.contains("</v1/albums?page=3&per_page=2>; rel=\"next\""));

    let body = body_json(response).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 2);
    assert_eq!(body["page_count"], 3);
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_albums_ignores_junk_pagination(pool: PgPool) {
    seed_album(&pool, "Solo").await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(get("/v1/albums?page=abc&per_page="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 100);
    assert_eq!(body["page_count"], 1);
    assert_eq!(body["total_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_album_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request("POST", "/v1/albums", None, json!({"name": "Kind of Blue"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::count_albums(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_album_success(pool: PgPool) {
    let state = test_state(pool.clone());
    let token = auth_token(&state);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/albums",
            Some(&token),
            json!({"name": "Kind of Blue"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Kind of Blue");
    let id = body["id"].as_str().unwrap().to_string();

    let response = app.oneshot(get(&format!("/v1/albums/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_album_validates_name(pool: PgPool) {
    let state = test_state(pool.clone());
    let token = auth_token(&state);
    let app = init_router(state);

    let response = app
        .oneshot(json_request("POST", "/v1/albums", Some(&token), json!({"name": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "There is some problem with the data you submitted."
    );
    assert_eq!(
        body["details"],
        json!([{"field": "name", "error": "must be between 1 and 128 characters"}])
    );
    assert_eq!(common::count_albums(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_album_success(pool: PgPool) {
    let id = seed_album(&pool, "Old Name").await;
    let state = test_state(pool);
    let token = auth_token(&state);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/albums/{id}"),
            Some(&token),
            json!({"name": "New Name"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "New Name");

    let response = app.oneshot(get(&format!("/v1/albums/{id}"))).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["name"], "New Name");
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_album_returns_not_found(pool: PgPool) {
    let state = test_state(pool);
    let token = auth_token(&state);
    let app = init_router(state);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/v1/albums/{}", Uuid::new_v4()),
            Some(&token),
            json!({"name": "New Name"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_album_returns_deleted_album(pool: PgPool) {
    let id = seed_album(&pool, "Short Lived").await;
    let state = test_state(pool.clone());
    let token = auth_token(&state);
    let app = init_router(state);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/albums/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Short Lived");
    assert_eq!(common::count_albums(&pool).await, 0);

    let response = app.oneshot(get(&format!("/v1/albums/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
