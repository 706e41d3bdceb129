//! Route surface and request handlers

pub mod auth;
pub mod health;
pub mod library;
pub mod records;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes.
///
/// The session gate is layered innermost so it runs ahead of every handler;
/// requests to `/` never reach routing at all — the gate answers them with a
/// redirect to the catalog listing.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authentication
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", post(auth::logout))
        // Catalog listing and detail
        .route("/library", get(library::list_books))
        .route("/library/new", get(records::new_book_form).post(records::create_book))
        .route("/library/:id", get(library::book_detail))
        // Borrow / return
        .route("/library/:id/borrow", post(library::borrow_book))
        .route("/library/:id/return", post(library::return_book))
        // Record mutation
        .route("/library/:id/edit", get(records::edit_book_form).post(records::update_book))
        .route("/library/:id/delete", post(records::delete_book))
        .layer(middleware::from_fn(session::session_gate))
        // Cover uploads run up to 10MB; leave headroom for the other fields.
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
