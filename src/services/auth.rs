//! Authentication and registration against the catalog API.
//!
//! Credential checking and account storage are the API server's job; this
//! service only exchanges credentials for a bearer token and forwards
//! registrations. Both calls run unauthenticated.

use crate::{
    error::AppResult,
    gateway::ApiGateway,
    models::{AccessToken, Credentials},
};

#[derive(Clone)]
pub struct AuthService {
    gateway: ApiGateway,
}

impl AuthService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, credentials: &Credentials) -> AppResult<AccessToken> {
        self.gateway.post("/v1/auth/login", credentials, None).await
    }

    /// Create a new account
    pub async fn register(&self, credentials: &Credentials) -> AppResult<()> {
        let _created: serde_json::Value = self.gateway.post("/v1/users", credentials, None).await?;
        Ok(())
    }
}
