//! Token generation

use crate::error::CsrfError;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;

/// Bytes of random material per token
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// A CSRF token: 32 random bytes rendered as 64 lowercase hex characters.
///
/// `Debug` does not print the value so a token never ends up in logs by
/// accident.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a fresh token from the operating system's CSPRNG
    pub fn generate() -> Result<Self, CsrfError> {
        Self::generate_from(&mut OsRng)
    }

    /// Generate a token from the given cryptographic random source
    pub fn generate_from<R>(rng: &mut R) -> Result<Self, CsrfError>
    where
        R: RngCore + CryptoRng,
    {
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| CsrfError::Generation(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// The hex value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the hex value
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}
