use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{DEFAULT_PAGE_SIZE, Pages, PaginationQuery};
use crate::validator::ValidatedJson;

use super::model::{Album, CreateAlbumRequest, UpdateAlbumRequest};
use super::service::AlbumService;

/// An identifier that is not a UUID cannot name an existing album.
fn parse_album_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found())
}

#[utoipa::path(
    get,
    path = "/v1/albums/{id}",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Album details", body = Album),
        (status = 404, description = "Album not found")
    ),
    tag = "Albums"
)]
#[instrument(skip(state, ctx))]
pub async fn get_album(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Album>, AppError> {
    let id = parse_album_id(&id)?;
    let album = AlbumService::get(&state.db, &ctx, id).await?;

    Ok(Json(album))
}

#[utoipa::path(
    get,
    path = "/v1/albums",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated list of albums", body = Pages<Album>)
    ),
    tag = "Albums"
)]
#[instrument(skip(state, ctx))]
pub async fn list_albums(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<PaginationQuery>,
) -> Result<Response, AppError> {
    let count = AlbumService::count(&state.db, &ctx).await?;
    let pages = query.pages::<Album>(count);
    let items = AlbumService::list(&state.db, &ctx, pages.offset(), pages.limit()).await?;
    let pages = pages.with_items(items);

    let link = pages.build_link_header("/v1/albums", DEFAULT_PAGE_SIZE);
    let mut response = Json(pages).into_response();
    if !link.is_empty() {
        let value = HeaderValue::from_str(&link)
            .map_err(|err| AppError::internal(anyhow::anyhow!("invalid link header: {err}")))?;
        response.headers_mut().insert(header::LINK, value);
    }

    Ok(response)
}

#[utoipa::path(
    post,
    path = "/v1/albums",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created", body = Album),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Albums",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, ctx, req))]
pub async fn create_album(
    State(state): State<AppState>,
    ctx: RequestContext,
    _user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<Album>), AppError> {
    let album = AlbumService::create(&state.db, &ctx, req).await?;

    Ok((StatusCode::CREATED, Json(album)))
}

#[utoipa::path(
    put,
    path = "/v1/albums/{id}",
    params(("id" = String, Path, description = "Album ID")),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Album updated", body = Album),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Album not found")
    ),
    tag = "Albums",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, ctx, req))]
pub async fn update_album(
    State(state): State<AppState>,
    ctx: RequestContext,
    _user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateAlbumRequest>,
) -> Result<Json<Album>, AppError> {
    let id = parse_album_id(&id)?;
    let album = AlbumService::update(&state.db, &ctx, id, req).await?;

    Ok(Json(album))
}

#[utoipa::path(
    delete,
    path = "/v1/albums/{id}",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Album deleted", body = Album),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Album not found")
    ),
    tag = "Albums",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, ctx))]
pub async fn delete_album(
    State(state): State<AppState>,
    ctx: RequestContext,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Album>, AppError> {
    let id = parse_album_id(&id)?;
    let album = AlbumService::delete(&state.db, &ctx, id).await?;

    Ok(Json(album))
}
