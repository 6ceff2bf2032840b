//! Middleware infrastructure
//!
//! Middleware is added with `ReelHub::layer` and runs before routing hands
//! the request to its handler.
//!
//! # Example
//!
//! ```rust,ignore
//! ReelHub::new()
//!     .layer(RequestIdLayer::new())
//!     .layer(TracingLayer::new())
//!     .route("/health", get(health))
//! ```

mod layer;
mod request_id;
mod tracing_layer;

pub use layer::{BoxedNext, LayerStack, MiddlewareLayer};
pub use request_id::{RequestId, RequestIdLayer, REQUEST_ID_HEADER};
pub use tracing_layer::TracingLayer;
