//! Request ID middleware

use super::layer::{BoxedNext, MiddlewareLayer};
use crate::request::Request;
use crate::response::Response;
use http::HeaderValue;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifier attached to every request as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh random ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Assigns a [`RequestId`] to each request and echoes it on the response
///
/// An incoming `x-request-id` header is reused when it is valid ASCII;
/// otherwise a UUID v4 is generated.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer
    pub fn new() -> Self {
        Self
    }
}

impl MiddlewareLayer for RequestIdLayer {
    fn call(
        &self,
        mut req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| RequestId(v.to_string()))
            .unwrap_or_else(RequestId::generate);

        req.extensions_mut().insert(id.clone());

        Box::pin(async move {
            let mut response = next(req).await;
            if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            response
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get, ReelHub, TestClient, TestRequest};

    async fn handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let app = ReelHub::new()
            .layer(RequestIdLayer::new())
            .route("/", get(handler));
        let client = TestClient::new(app);

        let res = client.get("/").await;
        let id = res.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_reuses_incoming_request_id() {
        let app = ReelHub::new()
            .layer(RequestIdLayer::new())
            .route("/", get(handler));
        let client = TestClient::new(app);

        let res = client
            .request(TestRequest::get("/").header(REQUEST_ID_HEADER, "edge-123"))
            .await;
        res.assert_header(REQUEST_ID_HEADER, "edge-123");
    }
}
