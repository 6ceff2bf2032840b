//! Reading and writing the CSRF cookie
//!
//! The issued cookie is `HttpOnly`, `SameSite=Strict`, scoped to `Path=/`
//! and lives for [`CsrfConfig::max_age`]. `Secure` follows
//! [`CsrfConfig::secure`], and the name is
//! [`CsrfConfig::effective_cookie_name`] so a prefixed name is never sent
//! without `Secure`.

use crate::config::CsrfConfig;
use crate::token::CsrfToken;
use cookie::{Cookie, SameSite};
use http::{header, HeaderMap};
use time::Duration;

/// Build the `Set-Cookie` cookie carrying `token`
pub fn token_cookie(config: &CsrfConfig, token: &CsrfToken) -> Cookie<'static> {
    let max_age = Duration::seconds(
        i64::try_from(config.max_age.as_secs()).unwrap_or(i64::MAX),
    );

    Cookie::build((
        config.effective_cookie_name().to_owned(),
        token.as_str().to_owned(),
    ))
        .path("/")
        .secure(config.secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

/// Find the value of cookie `name` across all `Cookie` headers
///
/// Unparseable pairs are skipped. Returns the value as sent, which may be
/// empty.
pub fn read_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}
