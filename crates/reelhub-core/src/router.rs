//! Router implementation using radix tree (matchit)
//!
//! Routes support dynamic path parameters using `{param}` syntax:
//!
//! ```rust,ignore
//! let router = Router::new()
//!     .route("/api/content/videos", get(list_videos).post(create_video))
//!     .route("/api/content/videos/{id}", delete(delete_video));
//! ```

use crate::error::ApiError;
use crate::handler::{into_boxed_handler, BoxedHandler, Handler};
use crate::middleware::BoxedNext;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use http::{header, Extensions, HeaderValue, Method, StatusCode};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP method router for a single path
#[derive(Clone, Default)]
pub struct MethodRouter {
    handlers: HashMap<Method, BoxedHandler>,
}

impl MethodRouter {
    /// Create a new empty method router
    pub fn new() -> Self {
        Self::default()
    }

    fn on<H, T>(mut self, method: Method, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        if self.handlers.contains_key(&method) {
            panic!(
                "Duplicate handler for method {} on the same path",
                method.as_str()
            );
        }
        self.handlers.insert(method, into_boxed_handler(handler));
        self
    }

    /// Chain a GET handler
    pub fn get<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::GET, handler)
    }

    /// Chain a POST handler
    pub fn post<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::POST, handler)
    }

    /// Chain a PUT handler
    pub fn put<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::PUT, handler)
    }

    /// Chain a PATCH handler
    pub fn patch<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::PATCH, handler)
    }

    /// Chain a DELETE handler
    pub fn delete<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::DELETE, handler)
    }

    pub(crate) fn get_handler(&self, method: &Method) -> Option<&BoxedHandler> {
        self.handlers.get(method)
    }

    /// Allowed methods for a 405 response, in a stable order
    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.handlers.keys().cloned().collect();
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        allowed
    }
}

/// Create a GET route handler
pub fn get<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().get(handler)
}

/// Create a POST route handler
pub fn post<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().post(handler)
}

/// Create a PUT route handler
pub fn put<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().put(handler)
}

/// Create a PATCH route handler
pub fn patch<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().patch(handler)
}

/// Create a DELETE route handler
pub fn delete<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().delete(handler)
}

/// Main router
pub struct Router {
    inner: MatchitRouter<MethodRouter>,
    state: Arc<Extensions>,
    paths: Vec<String>,
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Self {
            inner: MatchitRouter::new(),
            state: Arc::new(Extensions::new()),
            paths: Vec::new(),
        }
    }

    /// Add a route
    ///
    /// # Panics
    ///
    /// Panics if the path conflicts with an already registered route.
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        let matchit_path = convert_path_params(path);

        if let Err(e) = self.inner.insert(matchit_path, method_router) {
            panic!(
                "Route conflict for '{}' (registered: {:?}): {}",
                path, self.paths, e
            );
        }
        self.paths.push(path.to_string());
        self
    }

    /// Add application state
    pub fn state<S: Clone + Send + Sync + 'static>(mut self, state: S) -> Self {
        Arc::make_mut(&mut self.state).insert(state);
        self
    }

    pub(crate) fn match_route(&self, path: &str, method: &Method) -> RouteMatch<'_> {
        match self.inner.at(path) {
            Ok(matched) => {
                let method_router = matched.value;

                if let Some(handler) = method_router.get_handler(method) {
                    let params: HashMap<String, String> = matched
                        .params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();

                    RouteMatch::Found { handler, params }
                } else {
                    RouteMatch::MethodNotAllowed {
                        allowed: method_router.allowed_methods(),
                    }
                }
            }
            Err(_) => RouteMatch::NotFound,
        }
    }

    pub(crate) fn state_ref(&self) -> Arc<Extensions> {
        self.state.clone()
    }

    /// Route a request to its handler, answering 404/405 when nothing matches
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        let method = req.method().clone();
        let path = req.path().to_string();

        match self.match_route(&path, &method) {
            RouteMatch::Found { handler, params } => {
                req.path_params = params;
                let handler = handler.clone();
                handler(req).await
            }
            RouteMatch::NotFound => {
                ApiError::not_found(format!("No route found for {} {}", method, path))
                    .into_response()
            }
            RouteMatch::MethodNotAllowed { allowed } => {
                let allowed_str: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
                let mut response = ApiError::new(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "method_not_allowed",
                    format!("Method {} not allowed for {}", method, path),
                )
                .into_response();

                if let Ok(value) = HeaderValue::from_str(&allowed_str.join(", ")) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            }
        }
    }
}

/// Wrap a router as the innermost continuation of a middleware chain
pub(crate) fn into_next(router: Arc<Router>) -> BoxedNext {
    Arc::new(move |req: Request| {
        let router = router.clone();
        Box::pin(async move { router.dispatch(req).await })
            as Pin<Box<dyn Future<Output = Response> + Send + 'static>>
    })
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of route matching
pub(crate) enum RouteMatch<'a> {
    Found {
        handler: &'a BoxedHandler,
        params: HashMap<String, String>,
    },
    NotFound,
    MethodNotAllowed {
        allowed: Vec<Method>,
    },
}

/// Convert {param} style to :param for matchit
fn convert_path_params(path: &str) -> String {
    let mut result = String::with_capacity(path.len());

    for ch in path.chars() {
        match ch {
            '{' => result.push(':'),
            '}' => {}
            _ => result.push(ch),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn test_convert_path_params() {
        assert_eq!(
            convert_path_params("/api/content/videos/{id}"),
            "/api/content/videos/:id"
        );
        assert_eq!(convert_path_params("/api/csrf-token"), "/api/csrf-token");
    }

    #[test]
    fn test_match_route_outcomes() {
        let router = Router::new()
            .route("/api/content/videos", get(ok).post(ok))
            .route("/api/content/videos/{id}", delete(ok));

        match router.match_route("/api/content/videos/17", &Method::DELETE) {
            RouteMatch::Found { params, .. } => {
                assert_eq!(params.get("id").map(String::as_str), Some("17"));
            }
            _ => panic!("expected a match"),
        }

        match router.match_route("/api/content/videos", &Method::PUT) {
            RouteMatch::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET, Method::POST]);
            }
            _ => panic!("expected 405"),
        }

        assert!(matches!(
            router.match_route("/api/unknown", &Method::GET),
            RouteMatch::NotFound
        ));
    }

    #[test]
    #[should_panic(expected = "Route conflict")]
    fn test_conflicting_route_panics() {
        let _ = Router::new()
            .route("/api/content/videos/{id}", get(ok))
            .route("/api/content/videos/{video_id}", get(ok));
    }

    #[test]
    fn test_state_is_shared() {
        let router = Router::new().state(5u8).state(String::from("hub"));
        let state = router.state_ref();
        assert_eq!(state.get::<u8>(), Some(&5));
        assert_eq!(state.get::<String>().map(String::as_str), Some("hub"));
    }
}
