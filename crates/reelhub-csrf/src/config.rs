use std::time::Duration;

/// Configuration for CSRF protection.
#[derive(Clone, Debug)]
pub struct CsrfConfig {
    /// The name of the cookie used to store the CSRF token.
    /// The `__Host-` prefix pins the cookie to this origin with `Path=/`.
    /// Default: "__Host-csrf-token"
    pub cookie_name: String,

    /// The name of the header expected to contain the CSRF token.
    /// Default: "X-CSRF-Token"
    pub header_name: String,

    /// Whether the CSRF cookie carries the `Secure` attribute.
    /// Turned off only for local development over plain HTTP, in which case
    /// the `__Host-` prefix is dropped from the cookie name (browsers refuse
    /// prefixed cookies without `Secure`).
    /// Default: true
    pub secure: bool,

    /// The lifetime of the CSRF cookie.
    /// Default: 24 hours
    pub max_age: Duration,

    /// Path prefix of the API namespace the gate protects.
    /// Default: "/api"
    pub api_prefix: String,

    /// Path segment marking webhook endpoints, which are exempt.
    /// Default: "webhooks"
    pub webhook_segment: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "__Host-csrf-token".to_string(),
            header_name: "X-CSRF-Token".to_string(),
            secure: true,
            max_age: Duration::from_secs(60 * 60 * 24),
            api_prefix: "/api".to_string(),
            webhook_segment: "webhooks".to_string(),
        }
    }
}

impl CsrfConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie name.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the header name.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Set the secure flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the cookie lifetime.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the protected API prefix. A trailing slash is ignored.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.api_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    /// The cookie name actually written and read.
    ///
    /// Without `Secure`, the `__Host-` and `__Secure-` prefixes are stripped.
    pub fn effective_cookie_name(&self) -> &str {
        if self.secure {
            return &self.cookie_name;
        }
        ["__Host-", "__Secure-"]
            .iter()
            .find_map(|prefix| self.cookie_name.strip_prefix(*prefix))
            .unwrap_or(self.cookie_name.as_str())
    }

    /// Set the webhook marker segment.
    pub fn webhook_segment(mut self, segment: impl Into<String>) -> Self {
        self.webhook_segment = segment.into();
        self
    }
}
