//! HTTP server implementation

use crate::body_limit::read_limited;
use crate::middleware::LayerStack;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::{into_next, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be parsed
    #[error("invalid listen address `{addr}`: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Accepting a connection failed
    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),
}

pub(crate) struct Server {
    router: Arc<Router>,
    layers: Arc<LayerStack>,
    body_limit: usize,
}

impl Server {
    pub fn new(router: Router, layers: LayerStack, body_limit: usize) -> Self {
        Self {
            router: Arc::new(router),
            layers: Arc::new(layers),
            body_limit,
        }
    }

    /// Accept connections until `signal` resolves
    pub async fn run<F>(self, addr: &str, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr: SocketAddr = addr.parse().map_err(|source| ServerError::InvalidAddr {
            addr: addr.to_string(),
            source,
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        info!(%addr, "ReelHub admin API listening");

        tokio::pin!(signal);

        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => accepted.map_err(ServerError::Accept)?,
                _ = &mut signal => {
                    info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let router = self.router.clone();
            let layers = self.layers.clone();
            let body_limit = self.body_limit;

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<Incoming>| {
                    let router = router.clone();
                    let layers = layers.clone();
                    async move {
                        let response = handle_request(router, layers, body_limit, req).await;
                        Ok::<_, Infallible>(response)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(%remote_addr, error = %err, "Connection closed with error");
                }
            });
        }
    }
}

/// Buffer the body and run the request through the middleware stack
async fn handle_request(
    router: Arc<Router>,
    layers: Arc<LayerStack>,
    body_limit: usize,
    req: hyper::Request<Incoming>,
) -> Response {
    let (parts, body) = req.into_parts();

    let body = match read_limited(&parts.headers, body, body_limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(status = %err.status, "Refused request body");
            return err.into_response();
        }
    };

    let request = Request::new(parts, body, router.state_ref(), HashMap::new());
    layers.execute(request, into_next(router)).await
}
