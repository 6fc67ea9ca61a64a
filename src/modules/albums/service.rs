use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::DbContext;
use crate::utils::errors::AppError;

use super::model::{Album, CreateAlbumRequest, UpdateAlbumRequest};

pub struct AlbumService;

impl AlbumService {
    /// Returns the album with the given ID.
    #[instrument(skip(db, ctx))]
    pub async fn get(db: &DbContext, ctx: &RequestContext, id: Uuid) -> Result<Album, AppError> {
        let mut conn = db.conn(ctx).await?;
        let album = sqlx::query_as::<_, Album>(
            "SELECT id, name, created_at, updated_at FROM albums WHERE id = $1",
        )
        .bind(id)
        .fetch_one(conn.executor())
        .await?;

        Ok(album)
    }

    /// Returns the number of albums.
    #[instrument(skip(db, ctx))]
    pub async fn count(db: &DbContext, ctx: &RequestContext) -> Result<i64, AppError> {
        let mut conn = db.conn(ctx).await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM albums")
            .fetch_one(conn.executor())
            .await?;

        Ok(count)
    }

    /// Returns albums ordered by ID with the given offset and limit.
    #[instrument(skip(db, ctx))]
    pub async fn list(
        db: &DbContext,
        ctx: &RequestContext,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Album>, AppError> {
        let mut conn = db.conn(ctx).await?;
        let albums = sqlx::query_as::<_, Album>(
            "SELECT id, name, created_at, updated_at FROM albums ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(conn.executor())
        .await?;

        Ok(albums)
    }

    /// Creates a new album and returns it.
    #[instrument(skip(db, ctx, req))]
    pub async fn create(
        db: &DbContext,
        ctx: &RequestContext,
        req: CreateAlbumRequest,
    ) -> Result<Album, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut conn = db.conn(ctx).await?;
        sqlx::query("INSERT INTO albums (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&req.name)
            .bind(now)
            .bind(now)
            .execute(conn.executor())
            .await?;
        // Release the executor before the nested lookup resolves its own.
        drop(conn);

        Self::get(db, ctx, id).await
    }

    /// Updates the album with the given ID and returns the new state.
    #[instrument(skip(db, ctx, req))]
    pub async fn update(
        db: &DbContext,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAlbumRequest,
    ) -> Result<Album, AppError> {
        db.transactional(ctx, |ctx| async move {
            let mut album = Self::get(db, &ctx, id).await?;
            album.name = req.name;
            album.updated_at = Utc::now();

            let mut conn = db.conn(&ctx).await?;
            sqlx::query("UPDATE albums SET name = $1, updated_at = $2 WHERE id = $3")
                .bind(&album.name)
                .bind(album.updated_at)
                .bind(album.id)
                .execute(conn.executor())
                .await?;

            Ok(album)
        })
        .await
    }

    /// Deletes the album with the given ID and returns its last state.
    #[instrument(skip(db, ctx))]
    pub async fn delete(db: &DbContext, ctx: &RequestContext, id: Uuid) -> Result<Album, AppError> {
        db.transactional(ctx, |ctx| async move {
            let album = Self::get(db, &ctx, id).await?;

            let mut conn = db.conn(&ctx).await?;
            sqlx::query("DELETE FROM albums WHERE id = $1")
                .bind(id)
                .execute(conn.executor())
                .await?;

            Ok(album)
        })
        .await
    }
}
