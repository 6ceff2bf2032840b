//! Extractors
//!
//! Extractors pull typed data out of an incoming request before a handler runs.

use crate::error::{ApiError, Result};
use crate::request::Request;
use crate::response::Json;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::ops::Deref;
use std::str::FromStr;

/// Trait for extracting data from request parts (headers, path, state)
///
/// This is used for extractors that don't need the request body.
pub trait FromRequestParts: Sized {
    /// Extract from request parts
    fn from_request_parts(req: &Request) -> Result<Self>;
}

/// Trait for extracting data from the full request (including body)
pub trait FromRequest: Sized {
    /// Extract from the full request
    fn from_request(req: &mut Request) -> impl Future<Output = Result<Self>> + Send;
}

impl<T: FromRequestParts + Send> FromRequest for T {
    fn from_request(req: &mut Request) -> impl Future<Output = Result<Self>> + Send {
        let extracted = T::from_request_parts(req);
        async move { extracted }
    }
}

impl<T: DeserializeOwned + Send> FromRequest for Json<T> {
    async fn from_request(req: &mut Request) -> Result<Self> {
        let body = req
            .take_body()
            .ok_or_else(|| ApiError::internal("Body already consumed"))?;

        let value: T = serde_json::from_slice(&body)?;
        Ok(Json(value))
    }
}

/// Path parameter extractor
///
/// For a route `/api/content/videos/{id}`:
///
/// ```rust,ignore
/// async fn delete_video(Path(id): Path<u64>) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Path<T>(pub T);

impl<T: FromStr> FromRequestParts for Path<T>
where
    T::Err: std::fmt::Display,
{
    fn from_request_parts(req: &Request) -> Result<Self> {
        // Single-parameter routes only; take whichever parameter matched
        let Some(value) = req.path_params.values().next() else {
            return Err(ApiError::internal("Missing path parameter"));
        };

        value
            .parse::<T>()
            .map(Path)
            .map_err(|e| ApiError::bad_request(format!("Invalid path parameter: {}", e)))
    }
}

impl<T> Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// State extractor
///
/// Extracts shared application state registered with `ReelHub::state`.
#[derive(Debug, Clone)]
pub struct State<T>(pub T);

impl<T: Clone + Send + Sync + 'static> FromRequestParts for State<T> {
    fn from_request_parts(req: &Request) -> Result<Self> {
        req.state().get::<T>().cloned().map(State).ok_or_else(|| {
            ApiError::internal(format!(
                "State of type `{}` not found. Did you forget to call .state()?",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl<T> Deref for State<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Extensions, StatusCode};
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn request(body: &'static str, state: Extensions, params: &[(&str, &str)]) -> Request {
        let (parts, _) = http::Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts();
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Request::new(parts, Bytes::from(body), Arc::new(state), params)
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Payload {
        title: String,
    }

    #[tokio::test]
    async fn test_json_extraction() {
        let mut req = request(r#"{"title":"Intro"}"#, Extensions::new(), &[]);
        let Json(payload) = Json::<Payload>::from_request(&mut req).await.unwrap();
        assert_eq!(payload.title, "Intro");

        // Body can only be taken once
        let err = Json::<Payload>::from_request(&mut req).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let mut req = request("not json", Extensions::new(), &[]);
        let err = Json::<Payload>::from_request(&mut req).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_path_extraction() {
        let req = request("", Extensions::new(), &[("id", "42")]);
        let Path(id) = Path::<u64>::from_request_parts(&req).unwrap();
        assert_eq!(id, 42);

        let req = request("", Extensions::new(), &[("id", "abc")]);
        let err = Path::<u64>::from_request_parts(&req).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_state_extraction() {
        let mut state = Extensions::new();
        state.insert(7u32);
        let req = request("", state, &[]);

        let State(value) = State::<u32>::from_request_parts(&req).unwrap();
        assert_eq!(value, 7);
        assert!(State::<String>::from_request_parts(&req).is_err());
    }
}
