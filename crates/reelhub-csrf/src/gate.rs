//! Which requests need a token
//!
//! A request is protected when its method is state-changing (`POST`, `PUT`,
//! `PATCH`, `DELETE`), its path lies in the API namespace, and no path
//! segment is the webhook marker. Everything else passes untouched.

use crate::config::CsrfConfig;
use crate::error::CsrfError;
use crate::validator;
use http::{HeaderMap, Method};
use std::sync::Arc;

/// Why a request skips validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptReason {
    /// Read-only method
    SafeMethod,
    /// Path outside the API namespace
    OutsideApi,
    /// Webhook endpoint, authenticated by signature
    Webhook,
}

/// Result of classifying a request by method and path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No token needed
    Exempt(ExemptReason),
    /// Header and cookie must match
    Protected,
}

/// Result of running the gate over a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Passed through without validation
    Exempt(ExemptReason),
    /// Protected and validated
    Accepted,
    /// Protected and refused
    Rejected(CsrfError),
}

impl GateOutcome {
    /// Whether the request may reach its handler
    pub fn proceeds(&self) -> bool {
        !matches!(self, GateOutcome::Rejected(_))
    }
}

/// Decides which requests are protected and validates them
#[derive(Debug, Clone)]
pub struct RouteGate {
    config: Arc<CsrfConfig>,
}

impl RouteGate {
    /// Create a gate for the given configuration
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Classify a request by method and path
    pub fn classify(&self, method: &Method, path: &str) -> Classification {
        if !is_state_changing(method) {
            return Classification::Exempt(ExemptReason::SafeMethod);
        }
        if !in_namespace(path, &self.config.api_prefix) {
            return Classification::Exempt(ExemptReason::OutsideApi);
        }
        if has_segment(path, &self.config.webhook_segment) {
            return Classification::Exempt(ExemptReason::Webhook);
        }
        Classification::Protected
    }

    /// Classify, then validate protected requests
    pub fn check(&self, method: &Method, path: &str, headers: &HeaderMap) -> GateOutcome {
        match self.classify(method, path) {
            Classification::Exempt(reason) => GateOutcome::Exempt(reason),
            Classification::Protected => match validator::validate_request(headers, &self.config) {
                Ok(()) => GateOutcome::Accepted,
                Err(err) => GateOutcome::Rejected(err),
            },
        }
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// `path` equals `prefix` or continues it with `/`
fn in_namespace(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn has_segment(path: &str, segment: &str) -> bool {
    path.split('/').any(|s| s == segment)
}
