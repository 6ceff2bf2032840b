//! Request body size limit
//!
//! Bodies are buffered before the middleware stack runs, so the cap is
//! applied while reading: a declared `Content-Length` over the limit is
//! refused without reading, and any other body stops being read as soon as
//! it crosses the limit.

use crate::error::ApiError;
use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use hyper::body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};

/// Default body size limit: 1MB
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

fn too_large(limit: usize) -> ApiError {
    ApiError::new(
        StatusCode::PAYLOAD_TOO_LARGE,
        "payload_too_large",
        format!("Request body exceeds limit of {} bytes", limit),
    )
}

/// Buffer `body`, refusing anything larger than `limit` bytes with `413`
pub(crate) async fn read_limited<B>(
    headers: &HeaderMap,
    body: B,
    limit: usize,
) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(too_large(limit));
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => Err(too_large(limit)),
        Err(err) => Err(ApiError::bad_request("Failed to read request body")
            .with_internal(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_body_within_limit() {
        let body = Full::new(Bytes::from_static(b"{\"title\":\"Warmup\"}"));
        let bytes = read_limited(&HeaderMap::new(), body, 64).await.unwrap();
        assert_eq!(&bytes[..], b"{\"title\":\"Warmup\"}");
    }

    #[tokio::test]
    async fn test_oversized_body_refused() {
        let body = Full::new(Bytes::from(vec![b'x'; 65]));
        let err = read_limited(&HeaderMap::new(), body, 64).await.unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_declared_length_refused_before_reading() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("67108864"));
        // Body is empty; the header alone decides
        let err = read_limited(&headers, Full::new(Bytes::new()), DEFAULT_BODY_LIMIT)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            err.message,
            format!("Request body exceeds limit of {} bytes", DEFAULT_BODY_LIMIT)
        );
    }
}
