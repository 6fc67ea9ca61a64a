//! The request-scoped context threaded through the whole pipeline.
//!
//! A [`RequestContext`] is created by the access-log middleware, carried in
//! the request's extensions, and handed explicitly to every service and
//! repository call. It is an immutable value: binding a transaction derives
//! a child context instead of mutating the original.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::db::TxSlot;

/// Immutable per-request carrier of identifiers and the optional active
/// transaction.
///
/// The context only references the transaction slot; the middleware or
/// [`transactional`](crate::db::DbContext::transactional) scope that opened
/// the transaction stays in charge of committing or rolling it back.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    request_id: String,
    correlation_id: String,
    tx: Option<TxSlot>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            correlation_id: correlation_id.into(),
            tx: None,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Derives a child context with the given transaction slot bound.
    pub fn with_tx(&self, slot: TxSlot) -> Self {
        Self {
            request_id: self.request_id.clone(),
            correlation_id: self.correlation_id.clone(),
            tx: Some(slot),
        }
    }

    pub(crate) fn tx(&self) -> Option<&TxSlot> {
        self.tx.as_ref()
    }

    /// Whether a transaction is bound to this context.
    pub fn is_transactional(&self) -> bool {
        self.tx.is_some()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}
