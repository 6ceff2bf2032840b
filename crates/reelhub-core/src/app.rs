//! Application builder

use crate::body_limit::DEFAULT_BODY_LIMIT;
use crate::middleware::{LayerStack, MiddlewareLayer};
use crate::router::{MethodRouter, Router};
use crate::server::{Server, ServerError};
use std::future::Future;

/// Main application builder
///
/// # Example
///
/// ```rust,ignore
/// ReelHub::new()
///     .state(library)
///     .layer(RequestIdLayer::new())
///     .route("/api/content/videos", get(list_videos).post(create_video))
///     .run("127.0.0.1:8080")
///     .await
/// ```
pub struct ReelHub {
    router: Router,
    layers: LayerStack,
    body_limit: usize,
}

impl ReelHub {
    /// Create a new application
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            layers: LayerStack::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Set the largest accepted request body in bytes
    ///
    /// Larger bodies are answered with `413` before any layer runs.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Add a middleware layer
    ///
    /// Layers run in the order they are added, and all of them run before the
    /// router picks a handler.
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: MiddlewareLayer,
    {
        self.layers.push(Box::new(layer));
        self
    }

    /// Add application state, extractable with `State<T>`
    pub fn state<S>(mut self, state: S) -> Self
    where
        S: Clone + Send + Sync + 'static,
    {
        self.router = self.router.state(state);
        self
    }

    /// Add a route
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn into_parts(self) -> (Router, LayerStack, usize) {
        (self.router, self.layers, self.body_limit)
    }

    /// Run the server until the process is stopped
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        self.run_with_shutdown(addr, std::future::pending()).await
    }

    /// Run the server until `signal` resolves, then stop accepting connections
    pub async fn run_with_shutdown<F>(self, addr: &str, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        Server::new(self.router, self.layers, self.body_limit)
            .run(addr, signal)
            .await
    }
}

impl Default for ReelHub {
    fn default() -> Self {
        Self::new()
    }
}
