//! Double-submit comparison
//!
//! A request passes when the header value and the cookie value are both
//! present, both [`TOKEN_LENGTH`] characters long, and equal. The equality
//! check runs in constant time over the token bytes.

use crate::config::CsrfConfig;
use crate::error::CsrfError;
use crate::store;
use crate::token::TOKEN_LENGTH;
use http::HeaderMap;
use subtle::ConstantTimeEq;

/// Compare a header token against a cookie token
///
/// Absent or empty values give [`CsrfError::MissingCredential`]. Present
/// values that differ or have the wrong length give [`CsrfError::Mismatch`].
/// Pure: the same inputs always give the same answer, so a token stays
/// valid for as many requests as the cookie lives.
pub fn validate(header: Option<&str>, cookie: Option<&str>) -> Result<(), CsrfError> {
    let (header, cookie) = match (header, cookie) {
        (Some(h), Some(c)) if !h.is_empty() && !c.is_empty() => (h, c),
        _ => return Err(CsrfError::MissingCredential),
    };

    if header.len() != TOKEN_LENGTH || cookie.len() != TOKEN_LENGTH {
        return Err(CsrfError::Mismatch);
    }

    if bool::from(header.as_bytes().ct_eq(cookie.as_bytes())) {
        Ok(())
    } else {
        Err(CsrfError::Mismatch)
    }
}

/// Pull header and cookie out of `headers` and [`validate`] them
///
/// A header value with non-visible-ASCII bytes cannot match any issued
/// token and counts as a mismatch.
pub fn validate_request(headers: &HeaderMap, config: &CsrfConfig) -> Result<(), CsrfError> {
    let header = match headers.get(config.header_name.as_str()) {
        Some(value) => Some(value.to_str().map_err(|_| CsrfError::Mismatch)?),
        None => None,
    };
    let cookie = store::read_token(headers, config.effective_cookie_name());

    validate(header, cookie.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::CsrfToken;
    use http::{header, HeaderValue};
    use proptest::prelude::*;

    fn token() -> String {
        CsrfToken::generate().unwrap().into_string()
    }

    #[test]
    fn test_validation_table() {
        let t = token();
        let other = token();
        let short = &t[..63];

        assert_eq!(validate(Some(&t), Some(&t)), Ok(()));
        assert_eq!(validate(None, Some(&t)), Err(CsrfError::MissingCredential));
        assert_eq!(validate(Some(&t), None), Err(CsrfError::MissingCredential));
        assert_eq!(validate(None, None), Err(CsrfError::MissingCredential));
        assert_eq!(validate(Some(""), Some(&t)), Err(CsrfError::MissingCredential));
        assert_eq!(validate(Some(&t), Some("")), Err(CsrfError::MissingCredential));
        assert_eq!(validate(Some(&t), Some(&other)), Err(CsrfError::Mismatch));
        assert_eq!(validate(Some(short), Some(short)), Err(CsrfError::Mismatch));
        assert_eq!(validate(Some(short), Some(&t)), Err(CsrfError::Mismatch));
    }

    #[test]
    fn test_equal_but_overlong_rejected() {
        let long = format!("{}ff", token());
        assert_eq!(validate(Some(&long), Some(&long)), Err(CsrfError::Mismatch));
    }

    #[test]
    fn test_repeated_validation_is_stable() {
        let t = token();
        for _ in 0..100 {
            assert_eq!(validate(Some(&t), Some(&t)), Ok(()));
        }
    }

    #[test]
    fn test_validate_request_reads_header_and_cookie() {
        let config = CsrfConfig::default();
        let t = token();

        let mut headers = HeaderMap::new();
        headers.insert("x-csrf-token", HeaderValue::from_str(&t).unwrap());
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; __Host-csrf-token={}", t)).unwrap(),
        );
        assert_eq!(validate_request(&headers, &config), Ok(()));

        headers.remove(header::COOKIE);
        assert_eq!(
            validate_request(&headers, &config),
            Err(CsrfError::MissingCredential)
        );
    }

    #[test]
    fn test_development_cookie_name_is_read() {
        let config = CsrfConfig::new().secure(false);
        let t = token();

        let mut headers = HeaderMap::new();
        headers.insert("x-csrf-token", HeaderValue::from_str(&t).unwrap());
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("csrf-token={}", t)).unwrap(),
        );
        assert_eq!(validate_request(&headers, &config), Ok(()));
    }

    #[test]
    fn test_opaque_header_is_mismatch() {
        let config = CsrfConfig::default();
        let t = token();

        let mut headers = HeaderMap::new();
        headers.insert("x-csrf-token", HeaderValue::from_bytes(b"\xfftoken").unwrap());
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("__Host-csrf-token={}", t)).unwrap(),
        );
        assert_eq!(validate_request(&headers, &config), Err(CsrfError::Mismatch));
    }

    proptest! {
        #[test]
        fn prop_accepts_only_equal_full_length(a in "[0-9a-f]{0,80}", b in "[0-9a-f]{0,80}") {
            let accepted = validate(Some(&a), Some(&b)).is_ok();
            prop_assert_eq!(accepted, a == b && a.len() == TOKEN_LENGTH);
        }

        #[test]
        fn prop_generated_token_validates_against_itself(bytes in proptest::array::uniform32(any::<u8>())) {
            let t = hex::encode(bytes);
            prop_assert!(validate(Some(&t), Some(&t)).is_ok());
        }
    }
}
