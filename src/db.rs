//! Database access with request-scoped transaction support.
//!
//! [`DbContext`] resolves every query to either the transaction carried by
//! the current [`RequestContext`] or a plain pooled connection, so a unit of
//! work spanning several service and repository calls shares one transaction
//! without passing a handle through every signature.

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{Mutex, OwnedMappedMutexGuard, OwnedMutexGuard};
use tracing::error;

use crate::context::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

type PgTx = Transaction<'static, Postgres>;

/// Shared slot holding the transaction bound to one request scope.
///
/// Contexts hold references to the slot; only the scope that opened the
/// transaction drains it, exactly once, to commit or roll back. A slot
/// dropped with the transaction still inside rolls it back through sqlx's
/// connection-return path, so an unwinding panic or a cancelled request
/// cannot leak an open transaction.
#[derive(Clone)]
pub struct TxSlot(Arc<Mutex<Option<PgTx>>>);

impl TxSlot {
    fn new(tx: PgTx) -> Self {
        Self(Arc::new(Mutex::new(Some(tx))))
    }

    async fn commit(&self) -> Result<(), sqlx::Error> {
        match self.0.lock().await.take() {
            Some(tx) => tx.commit().await,
            None => Ok(()),
        }
    }

    /// Best-effort rollback; a failure here is logged and swallowed so the
    /// caller keeps seeing the error that caused the rollback.
    async fn rollback(&self) {
        if let Some(tx) = self.0.lock().await.take() {
            if let Err(err) = tx.rollback().await {
                error!(error = %err, "failed rolling back transaction");
            }
        }
    }
}

impl std::fmt::Debug for TxSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TxSlot")
    }
}

/// Executor for one piece of database work: the context's transaction when
/// one is live, otherwise a connection checked out from the pool.
///
/// Holds the transaction lock while alive. Release it (drop) before making
/// a nested call that resolves its own executor.
pub struct DbConn(ConnInner);

enum ConnInner {
    Pooled(PoolConnection<Postgres>),
    Tx(OwnedMappedMutexGuard<Option<PgTx>, PgTx>),
}

impl DbConn {
    /// The connection to run queries against.
    pub fn executor(&mut self) -> &mut PgConnection {
        match &mut self.0 {
            ConnInner::Pooled(conn) => &mut **conn,
            ConnInner::Tx(tx) => &mut ***tx,
        }
    }
}

/// A handle to the database addressable through a [`RequestContext`].
#[derive(Clone, Debug)]
pub struct DbContext {
    pool: PgPool,
}

impl DbContext {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the executor bound to `ctx`.
    ///
    /// The lookup itself cannot fail: a context without a live transaction
    /// (including one whose owning scope already finished) falls back to the
    /// pool. Only acquiring a pooled connection can error.
    pub async fn conn(&self, ctx: &RequestContext) -> Result<DbConn, sqlx::Error> {
        if let Some(slot) = ctx.tx() {
            let guard = slot.0.clone().lock_owned().await;
            if let Ok(tx) = OwnedMutexGuard::try_map(guard, Option::as_mut) {
                return Ok(DbConn(ConnInner::Tx(tx)));
            }
        }
        Ok(DbConn(ConnInner::Pooled(self.pool.acquire().await?)))
    }

    /// Runs `f` inside a database transaction.
    ///
    /// A fresh transaction is opened and bound to the child context handed
    /// to `f`. The transaction commits when `f` returns `Ok` and rolls back
    /// when it returns `Err`; the original error propagates either way. A
    /// commit failure becomes the operation's result.
    ///
    /// When `ctx` already carries a transaction, `f` joins it: the enclosing
    /// scope keeps sole control of commit and rollback, so nesting never
    /// double-applies.
    pub async fn transactional<T, F, Fut>(&self, ctx: &RequestContext, f: F) -> Result<T, AppError>
    where
        F: FnOnce(RequestContext) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if ctx.is_transactional() {
            return f(ctx.clone()).await;
        }

        let slot = TxSlot::new(self.pool.begin().await?);
        match f(ctx.with_tx(slot.clone())).await {
            Ok(value) => {
                slot.commit().await?;
                Ok(value)
            }
            Err(err) => {
                slot.rollback().await;
                Err(err)
            }
        }
    }
}

/// Middleware wrapping the downstream pipeline in a transaction.
///
/// Failures are converted into responses at the recovery boundary before
/// they reach this layer, so the transaction commits even when the response
/// carries an error status; that is deliberate, matching the policy that
/// errors already turned into responses commit normally. Only a panic
/// (which unwinds past this frame and drops the open transaction) or a
/// commit failure prevents the commit.
pub async fn transaction_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    state
        .db
        .transactional(&ctx, move |child| async move {
            req.extensions_mut().insert(child);
            Ok(next.run(req).await)
        })
        .await
}
