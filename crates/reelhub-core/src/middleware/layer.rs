//! Middleware chaining
//!
//! Layers wrap the final handler; each layer receives the request and a
//! `next` continuation it may call (or skip, to short-circuit).

use crate::request::Request;
use crate::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed next function for middleware chains
pub type BoxedNext =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> + Send + Sync>;

/// Trait for middleware that can be applied with `ReelHub::layer`
pub trait MiddlewareLayer: Send + Sync + 'static {
    /// Apply this middleware to a request, calling `next` to continue the chain
    fn call(
        &self,
        req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

    /// Clone this middleware into a boxed trait object
    fn clone_box(&self) -> Box<dyn MiddlewareLayer>;
}

impl Clone for Box<dyn MiddlewareLayer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A stack of middleware layers
#[derive(Clone, Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn MiddlewareLayer>>,
}

impl LayerStack {
    /// Create a new empty layer stack
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a middleware layer to the stack
    ///
    /// Layers are executed in the order they are added (outermost first).
    pub fn push(&mut self, layer: Box<dyn MiddlewareLayer>) {
        self.layers.push(layer);
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Get the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Execute the middleware stack with a final handler
    pub fn execute(
        &self,
        req: Request,
        handler: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        if self.layers.is_empty() {
            return handler(req);
        }

        // Build the chain from inside out so the first layer added runs first
        let mut next = handler;

        for layer in self.layers.iter().rev() {
            let layer: Arc<dyn MiddlewareLayer> = Arc::from(layer.clone_box());
            let current_next = next;
            next = Arc::new(move |req: Request| {
                let layer = layer.clone();
                let next = current_next.clone();
                Box::pin(async move { layer.call(req, next).await })
                    as Pin<Box<dyn Future<Output = Response> + Send + 'static>>
            });
        }

        next(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Extensions, Method, StatusCode};
    use http_body_util::Full;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn create_test_request(method: Method, path: &str) -> Request {
        let (parts, _) = http::Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap()
            .into_parts();

        Request::new(parts, Bytes::new(), Arc::new(Extensions::new()), HashMap::new())
    }

    fn ok_handler(called: Arc<AtomicBool>) -> BoxedNext {
        Arc::new(move |_req: Request| {
            let called = called.clone();
            Box::pin(async move {
                called.store(true, Ordering::SeqCst);
                http::Response::new(Full::new(Bytes::from("handler")))
            }) as Pin<Box<dyn Future<Output = Response> + Send + 'static>>
        })
    }

    /// Records pre/post execution order
    #[derive(Clone)]
    struct OrderTracking {
        id: usize,
        order: Arc<Mutex<Vec<(usize, &'static str)>>>,
    }

    impl MiddlewareLayer for OrderTracking {
        fn call(
            &self,
            req: Request,
            next: BoxedNext,
        ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
            let id = self.id;
            let order = self.order.clone();

            Box::pin(async move {
                order.lock().unwrap().push((id, "pre"));
                let response = next(req).await;
                order.lock().unwrap().push((id, "post"));
                response
            })
        }

        fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
            Box::new(self.clone())
        }
    }

    /// Answers without calling next
    #[derive(Clone)]
    struct ShortCircuit(StatusCode);

    impl MiddlewareLayer for ShortCircuit {
        fn call(
            &self,
            _req: Request,
            _next: BoxedNext,
        ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
            let status = self.0;
            Box::pin(async move {
                let mut response = http::Response::new(Full::new(Bytes::new()));
                *response.status_mut() = status;
                response
            })
        }

        fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_layer_stack_calls_handler_directly() {
        let called = Arc::new(AtomicBool::new(false));
        let stack = LayerStack::new();

        let response = stack
            .execute(create_test_request(Method::GET, "/"), ok_handler(called.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let called = Arc::new(AtomicBool::new(false));
        let mut stack = LayerStack::new();
        stack.push(Box::new(ShortCircuit(StatusCode::FORBIDDEN)));

        let response = stack
            .execute(
                create_test_request(Method::POST, "/api/content/videos"),
                ok_handler(called.clone()),
            )
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!called.load(Ordering::SeqCst));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        // Requests pass L1 → ... → Ln → handler → Ln → ... → L1
        #[test]
        fn prop_middleware_execution_order(num_layers in 1usize..8usize) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let order = Arc::new(Mutex::new(Vec::new()));
                let mut stack = LayerStack::new();
                for id in 0..num_layers {
                    stack.push(Box::new(OrderTracking { id, order: order.clone() }));
                }

                let called = Arc::new(AtomicBool::new(false));
                let _ = stack
                    .execute(create_test_request(Method::GET, "/"), ok_handler(called))
                    .await;

                let order = order.lock().unwrap();
                prop_assert_eq!(order.len(), num_layers * 2);
                for i in 0..num_layers {
                    prop_assert_eq!(order[i], (i, "pre"));
                    prop_assert_eq!(order[num_layers + i], (num_layers - 1 - i, "post"));
                }
                Ok(())
            });
            result?;
        }
    }
}
