//! Panic recovery at the edge of the request pipeline.
//!
//! A panic below this layer is logged with a backtrace, converted into the
//! same internal failure used for ordinary errors and classified into the
//! standard envelope, so every request produces exactly one well-formed
//! response. The recovered request reports success upward; by the time the
//! response passes outer layers the failure is fully handled.

use std::any::Any;
use std::backtrace::Backtrace;

use axum::body::Body;
use axum::http;
use axum::response::IntoResponse;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tracing::error;

use crate::utils::errors::AppError;

/// Layer converting panics into the classified 500 envelope.
pub fn recovery_layer() -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder)
}

#[derive(Clone, Copy, Debug)]
pub struct PanicResponder;

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "non-string panic payload".to_string()
        };

        error!(
            panic = %detail,
            backtrace = %Backtrace::force_capture(),
            "recovered from panic",
        );

        AppError::internal(anyhow::anyhow!("recovered from panic: {detail}")).into_response()
    }
}
