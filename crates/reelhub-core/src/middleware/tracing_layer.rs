//! Request tracing middleware
//!
//! Opens a span per request with method, path, and request id, and logs the
//! outcome with status and duration.

use super::layer::{BoxedNext, MiddlewareLayer};
use super::request_id::RequestId;
use crate::request::Request;
use crate::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tracing::{info_span, Instrument};

/// Middleware layer that creates tracing spans for requests
///
/// Apply after [`RequestIdLayer`](super::RequestIdLayer) so the span carries
/// the request ID.
#[derive(Clone)]
pub struct TracingLayer {
    service: String,
}

impl TracingLayer {
    /// Create a new tracing layer
    pub fn new() -> Self {
        Self {
            service: "reelhub".to_string(),
        }
    }

    /// Name of the service recorded on every span
    pub fn service(mut self, name: impl Into<String>) -> Self {
        self.service = name.into();
        self
    }
}

impl Default for TracingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MiddlewareLayer for TracingLayer {
    fn call(
        &self,
        req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let span = info_span!(
            "http_request",
            service = %self.service,
            method = %method,
            path = %path,
            request_id = %request_id,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        Box::pin(async move {
            let start = Instant::now();
            let response = next(req).instrument(span.clone()).await;

            let status = response.status();
            let duration_ms = start.elapsed().as_millis() as u64;
            span.record("status", status.as_u16());
            span.record("duration_ms", duration_ms);

            let _enter = span.enter();
            if status.is_server_error() {
                tracing::error!(status = status.as_u16(), duration_ms, "Request failed");
            } else if status.is_client_error() {
                tracing::warn!(status = status.as_u16(), duration_ms, "Request rejected");
            } else {
                tracing::info!(status = status.as_u16(), duration_ms, "Request completed");
            }

            response
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
