//! The token-issuing endpoint

use crate::config::CsrfConfig;
use crate::error::CsrfError;
use crate::store;
use crate::token::CsrfToken;
use http::{header, HeaderValue};
use reelhub_core::{IntoResponse, Json, Response, State};
use serde::{Deserialize, Serialize};

/// Body of a successful `GET /api/csrf-token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssued {
    /// Always `true`
    pub success: bool,
    /// The token, identical to the cookie value
    pub csrf_token: String,
}

/// Handler for `GET /api/csrf-token`
///
/// Expects a [`CsrfConfig`] in application state. Every call issues a new
/// token and overwrites the cookie; earlier tokens are not revoked.
pub async fn issue_token(State(config): State<CsrfConfig>) -> Response {
    issue_with(&config, CsrfToken::generate)
}

/// Issue a token produced by `generate`
///
/// On failure answers `500` without setting a cookie.
pub fn issue_with<G>(config: &CsrfConfig, generate: G) -> Response
where
    G: FnOnce() -> Result<CsrfToken, CsrfError>,
{
    let token = match generate() {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "CSRF token generation failed");
            return err.into_response();
        }
    };

    let cookie = store::token_cookie(config, &token);
    let cookie = match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => value,
        Err(e) => {
            return CsrfError::Generation(format!("unencodable cookie: {}", e)).into_response()
        }
    };

    let mut response = Json(TokenIssued {
        success: true,
        csrf_token: token.into_string(),
    })
    .into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);

    tracing::debug!("Issued CSRF token");
    response
}
