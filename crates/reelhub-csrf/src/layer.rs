//! Gate middleware

use crate::config::CsrfConfig;
use crate::gate::{GateOutcome, RouteGate};
use reelhub_core::middleware::{BoxedNext, MiddlewareLayer};
use reelhub_core::{IntoResponse, Request, Response};
use std::future::Future;
use std::pin::Pin;

/// Middleware enforcing the double-submit check on protected routes.
///
/// Runs before routing, so a rejected request never reaches its handler.
/// Rejections answer `403` with the shared failure body and are logged at
/// `warn` with the cause. Token values are never logged.
#[derive(Clone, Debug)]
pub struct CsrfLayer {
    gate: RouteGate,
}

impl CsrfLayer {
    /// Create a new CSRF middleware layer.
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            gate: RouteGate::new(config),
        }
    }

    /// The gate deciding which requests are checked.
    pub fn gate(&self) -> &RouteGate {
        &self.gate
    }
}

impl MiddlewareLayer for CsrfLayer {
    fn call(
        &self,
        req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let outcome = self.gate.check(req.method(), req.path(), req.headers());

        if let GateOutcome::Rejected(err) = &outcome {
            tracing::warn!(
                method = %req.method(),
                path = %req.path(),
                reason = err.reason(),
                "CSRF validation rejected request"
            );
            let response = err.clone().into_response();
            return Box::pin(async move { response });
        }

        match &outcome {
            GateOutcome::Exempt(reason) => {
                tracing::trace!(path = %req.path(), reason = ?reason, "CSRF check skipped")
            }
            _ => tracing::debug!(path = %req.path(), "CSRF token accepted"),
        }

        Box::pin(async move { next(req).await })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
