//! CSRF protection for the ReelHub admin API
//!
//! Implements the stateless double-submit-cookie pattern:
//!
//! 1. `GET /api/csrf-token` ([`issue_token`]) generates a 64-character hex
//!    token, sets it as a `__Host-` cookie and returns it in the JSON body.
//! 2. The dashboard echoes the token in `X-CSRF-Token` on every
//!    state-changing API call.
//! 3. [`CsrfLayer`] compares header and cookie before any handler runs and
//!    answers `403` when they are missing or differ.
//!
//! No token is stored server-side. Webhook paths are exempt because the
//! payment provider signs them instead.
//!
//! [`TokenCache`] is the client half: callers of the API keep one token
//! until it expires instead of fetching before every request.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelhub_core::{get, ReelHub};
//! use reelhub_csrf::{issue_token, CsrfConfig, CsrfLayer};
//!
//! let config = CsrfConfig::new().secure(false);
//!
//! let app = ReelHub::new()
//!     .state(config.clone())
//!     .layer(CsrfLayer::new(config))
//!     .route("/api/csrf-token", get(issue_token));
//! ```

#![warn(missing_docs)]

pub mod cache;
mod config;
mod error;
pub mod gate;
pub mod issue;
pub mod layer;
pub mod store;
pub mod token;
pub mod validator;

pub use cache::TokenCache;
pub use config::CsrfConfig;
pub use error::{CsrfError, GENERATION_FAILED_MESSAGE, VALIDATION_FAILED_MESSAGE};
pub use gate::{Classification, ExemptReason, GateOutcome, RouteGate};
pub use issue::{issue_token, issue_with, TokenIssued};
pub use layer::CsrfLayer;
pub use token::{CsrfToken, TOKEN_BYTES, TOKEN_LENGTH};
