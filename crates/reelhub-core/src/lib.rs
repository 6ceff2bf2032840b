//! # ReelHub Core
//!
//! Foundational HTTP types and traits for the ReelHub admin API.
//!
//! The admin binary assembles these pieces; the CSRF gate plugs into the
//! middleware stack through [`middleware::MiddlewareLayer`].

mod app;
mod body_limit;
mod error;
mod extract;
mod handler;
pub mod middleware;
mod request;
mod response;
mod router;
mod server;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use app::ReelHub;
pub use body_limit::DEFAULT_BODY_LIMIT;
pub use error::{ApiError, Result};
pub use extract::{FromRequest, FromRequestParts, Path, State};
pub use handler::Handler;
pub use middleware::{RequestId, RequestIdLayer, TracingLayer};
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::{delete, get, patch, post, put, MethodRouter, Router};
pub use server::ServerError;
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
