//! Session credential and authentication payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Login / registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token issued by `POST /v1/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Opaque bearer credential carried by the session cookie.
///
/// The client never inspects or verifies the token; it only attaches it to
/// outbound calls. Set on login, cleared on logout or verification failure.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the raw token out of log output.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}
