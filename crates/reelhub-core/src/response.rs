//! Response types
//!
//! The core trait is [`IntoResponse`], which allows handlers to return any
//! type that can be turned into an HTTP response.
//!
//! | Type | Status | Content-Type |
//! |------|--------|--------------|
//! | `String` / `&str` | 200 | text/plain |
//! | `()` | 200 | - |
//! | [`Json<T>`] | 200 | application/json |
//! | `(StatusCode, R)` | given | from `R` |
//! | [`ApiError`] | varies | application/json |

use crate::error::{ApiError, ErrorResponse};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// HTTP Response type
pub type Response = http::Response<Full<Bytes>>;

/// Trait for types that can be converted into an HTTP response
pub trait IntoResponse {
    /// Convert self into a Response
    fn into_response(self) -> Response;
}

fn build(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        build(StatusCode::OK, None, Bytes::new())
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        build(
            StatusCode::OK,
            Some("text/plain; charset=utf-8"),
            Bytes::from(self),
        )
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        build(
            StatusCode::OK,
            Some("text/plain; charset=utf-8"),
            Bytes::from(self),
        )
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        build(self, None, Bytes::new())
    }
}

impl<R: IntoResponse> IntoResponse for (StatusCode, R) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        if let Some(internal) = &self.internal {
            tracing::error!(
                error_type = %self.error_type,
                status = status.as_u16(),
                internal = %internal,
                "{}",
                self.message
            );
        }

        let body = serde_json::to_vec(&ErrorResponse::from(self)).unwrap_or_else(|_| {
            br#"{"success":false,"error":"Failed to serialize error"}"#.to_vec()
        });

        build(status, Some("application/json"), Bytes::from(body))
    }
}

/// JSON body, usable both as an extractor and as a response
///
/// # Example
///
/// ```rust,ignore
/// async fn create(Json(body): Json<NewVideo>) -> Json<Video> {
///     Json(library.insert(body))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => build(StatusCode::OK, Some("application/json"), Bytes::from(body)),
            Err(err) => ApiError::internal("Failed to serialize response")
                .with_internal(err.to_string())
                .into_response(),
        }
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_to_bytes(body: Full<Bytes>) -> Bytes {
        body.collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_api_error_renders_envelope() {
        let response = ApiError::forbidden("CSRF token validation failed").into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = body_to_bytes(response.into_body()).await;
        assert_eq!(
            &body[..],
            br#"{"success":false,"error":"CSRF token validation failed"}"#
        );
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = Json(serde_json::json!({ "success": true })).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_bytes(response.into_body()).await;
        assert_eq!(&body[..], br#"{"success":true}"#);
    }

    #[test]
    fn test_status_tuple_overrides_status() {
        let response = (StatusCode::CREATED, "made").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_result_picks_branch() {
        let ok: std::result::Result<&'static str, ApiError> = Ok("fine");
        assert_eq!(ok.into_response().status(), StatusCode::OK);

        let err: std::result::Result<&'static str, ApiError> = Err(ApiError::not_found("gone"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
