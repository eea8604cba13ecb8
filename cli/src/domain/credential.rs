//! Credential triple parsed from `user:secret@host`.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::error::StartupError;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static CREDENTIAL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+:.+@.+$").expect("valid credential pattern"));

/// Host, user and secret used to open the remote session.
///
/// The secret is wiped from memory on drop and redacted from `Debug`.
#[derive(Clone)]
pub struct Credential {
    host: String,
    user: String,
    secret: Zeroizing<String>,
}

impl Credential {
    /// Parses `user:secret@host`.
    ///
    /// The user ends at the first `:` and the host starts after the last `@`,
    /// so the secret may itself contain `:` or `@`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MalformedCredential`] if the input does not
    /// have three non-empty parts.
    pub fn parse(input: &str) -> Result<Self, StartupError> {
        if !CREDENTIAL_SHAPE.is_match(input) {
            return Err(StartupError::MalformedCredential);
        }
        let (user, rest) = input
            .split_once(':')
            .ok_or(StartupError::MalformedCredential)?;
        let (secret, host) = rest
            .rsplit_once('@')
            .ok_or(StartupError::MalformedCredential)?;
        if user.is_empty() || secret.is_empty() || host.is_empty() {
            return Err(StartupError::MalformedCredential);
        }
        Ok(Self {
            host: host.to_string(),
            user: user.to_string(),
            secret: Zeroizing::new(secret.to_string()),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("secret", &"***")
            .finish()
    }
}
