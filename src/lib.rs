//! Lectern Library Catalog Web Client
//!
//! A web client for a remote library catalog API: it serves the user-facing
//! routes, orchestrates borrow/return flows and catalog edits, and leaves all
//! inventory and authorization decisions to the API server.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod services;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
