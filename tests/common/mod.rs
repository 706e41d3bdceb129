//! Shared helpers for the integration tests.
//!
//! Every test drives the real gateway/services against a wiremock server
//! standing in for the remote catalog API.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use lectern::{
    config::{ApiConfig, AppConfig},
    gateway::ApiGateway,
    models::SessionToken,
    services::Services,
    AppState,
};

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

pub fn gateway(base_url: &str) -> ApiGateway {
    ApiGateway::new(&api_config(base_url)).expect("Failed to build gateway")
}

pub fn services(base_url: &str) -> Services {
    Services::new(gateway(base_url))
}

pub fn app_state(base_url: &str) -> AppState {
    let config = AppConfig {
        api: api_config(base_url),
        ..AppConfig::default()
    };
    AppState {
        services: Arc::new(Services::new(
            ApiGateway::new(&config.api).expect("Failed to build gateway"),
        )),
        config: Arc::new(config),
    }
}

pub fn token() -> SessionToken {
    SessionToken::new("test-access-token")
}

/// Wrap a payload in the API's `{ data }` envelope
pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}

/// A book record as the catalog API serializes it
pub fn book_json(id: &str, available: i64, total: i64) -> Value {
    json!({
        "id": id,
        "title": "Clean Code",
        "author": "Robert C. Martin",
        "description": "A handbook of agile software craftsmanship",
        "ISBN": "978-0132350884",
        "publicationYear": 2008,
        "totalQuantity": total,
        "availableQuantity": available,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z",
        "coverImage": null
    })
}

/// A borrow record as the catalog API serializes it
pub fn borrow_record_json(id: &str, returned_at: Option<&str>) -> Value {
    json!({
        "id": id,
        "user": { "id": "u-1", "username": "alice" },
        "book": { "id": "b-1", "title": "Clean Code", "author": "Robert C. Martin" },
        "borrowedAt": "2024-03-01T10:00:00Z",
        "dueDate": "2024-03-15T10:00:00Z",
        "returnedAt": returned_at,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z"
    })
}
