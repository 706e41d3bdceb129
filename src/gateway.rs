//! API gateway client.
//!
//! The single chokepoint between this client and the remote catalog API.
//! Every other component goes through here and never performs raw network
//! calls itself. The gateway composes absolute URLs from the configured base,
//! attaches the bearer credential when one is supplied, unwraps the JSON
//! `{ data, message }` envelope, and converts non-2xx responses into typed
//! failures carrying the server's `message` field.

use reqwest::{multipart::Form, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::SessionToken,
};

/// JSON envelope used by every API response
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
}

impl ApiGateway {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&SessionToken>,
    ) -> AppResult<T> {
        let raw = self
            .dispatch(Method::GET, path, query, RequestBody::Empty, token)
            .await?;
        decode(raw)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SessionToken>,
    ) -> AppResult<T> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let raw = self.dispatch(Method::POST, path, &[], body, token).await?;
        decode(raw)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        token: Option<&SessionToken>,
    ) -> AppResult<T> {
        let raw = self
            .dispatch(Method::POST, path, &[], RequestBody::Multipart(form), token)
            .await?;
        decode(raw)
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        token: Option<&SessionToken>,
    ) -> AppResult<T> {
        let raw = self
            .dispatch(Method::PUT, path, &[], RequestBody::Multipart(form), token)
            .await?;
        decode(raw)
    }

    pub async fn delete(&self, path: &str, token: Option<&SessionToken>) -> AppResult<()> {
        self.dispatch(Method::DELETE, path, &[], RequestBody::Empty, token)
            .await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody,
        token: Option<&SessionToken>,
    ) -> AppResult<Value> {
        let mut request = self.http.request(method, format!("{}{}", self.base_url, path));
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            RequestBody::Empty => request,
            // `json` sets the JSON content-type; multipart leaves the
            // content-type to the transport so it can carry the boundary.
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };
        let authenticated = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        // The API speaks JSON on every path, errors included.
        let raw: Value = response.json().await?;

        if !status.is_success() {
            let message = error_message(&raw)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            // A rejected credential on an authenticated call routes back to
            // login. A 401 on an unauthenticated call (a failed login) is an
            // ordinary rejection, surfaced in-page.
            if status == StatusCode::UNAUTHORIZED && authenticated {
                return Err(AppError::Authentication(message));
            }
            return Err(AppError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(raw)
    }
}

fn decode<T: DeserializeOwned>(raw: Value) -> AppResult<T> {
    let envelope: Envelope<T> = serde_json::from_value(raw)?;
    Ok(envelope.data)
}

/// The `message` field is a string on most errors but an array of
/// per-field messages on validation failures. Normalize both.
fn error_message(raw: &Value) -> Option<String> {
    match raw.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        Some(Value::Array(parts)) => {
            let joined = parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}
