//! Catalog listing, detail and borrow/return handlers.
//!
//! Borrow and return run through the circulation coordinator: a malformed
//! quantity settles before any round-trip, a confirmed mutation comes back
//! with the re-fetched book so the view never drifts from server state.

use axum::{
    extract::{Path, Query, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{split_messages, AppError, AppResult},
    models::{Book, BookQuery, PageMeta},
    services::circulation::{self, Outcome, Settlement},
    AppState,
};

use super::session::Session;

/// View-model for the catalog listing page
#[derive(Serialize)]
pub struct LibraryView {
    pub books: Vec<Book>,
    pub meta: PageMeta,
    pub search: String,
}

pub async fn list_books(
    State(state): State<AppState>,
    Session(token): Session,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<LibraryView>> {
    let page = state.services.catalog.list_books(&token, &query).await?;
    Ok(Json(LibraryView {
        books: page.data,
        meta: page.meta,
        search: query.search,
    }))
}

/// View-model for the book detail page
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailView {
    pub book: Book,
    /// Whether the session's user holds an open loan on this book
    pub user_borrowed: bool,
}

pub async fn book_detail(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetailView>> {
    let book = state.services.catalog.get_book(&token, &id).await?;

    let user_borrowed = match state.services.catalog.user_has_open_loan(&token, &id).await {
        Ok(flag) => flag,
        Err(error @ AppError::Authentication(_)) => return Err(error),
        Err(error) => {
            // The detail page is still useful without the flag.
            tracing::warn!("Open-loan lookup failed for {}: {}", id, error);
            false
        }
    };

    Ok(Json(BookDetailView {
        book,
        user_borrowed,
    }))
}

#[derive(Deserialize)]
pub struct QuantityForm {
    #[serde(default)]
    pub qty: String,
}

/// Settled state of a borrow/return attempt, as shown to the user
#[derive(Serialize)]
pub struct SettlementView {
    pub phase: &'static str,
    pub outcome: Outcome,
    pub message: String,
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

impl From<Settlement> for SettlementView {
    fn from(settlement: Settlement) -> Self {
        Self {
            phase: "settled",
            outcome: settlement.outcome,
            messages: split_messages(&settlement.message),
            message: settlement.message,
            book: settlement.book,
        }
    }
}

pub async fn borrow_book(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> AppResult<Json<SettlementView>> {
    // Malformed quantities settle before any round-trip.
    let qty = match circulation::parse_quantity(&form.qty) {
        Ok(qty) => qty,
        Err(message) => return Ok(Json(Settlement::rejected(message).into())),
    };

    let book = state.services.catalog.get_book(&token, &id).await?;
    let settlement = state.services.circulation.borrow(&token, &book, qty).await?;
    Ok(Json(settlement.into()))
}

pub async fn return_book(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> AppResult<Json<SettlementView>> {
    let qty = match circulation::parse_quantity(&form.qty) {
        Ok(qty) => qty,
        Err(message) => return Ok(Json(Settlement::rejected(message).into())),
    };

    let book = state.services.catalog.get_book(&token, &id).await?;
    let settlement = state
        .services
        .circulation
        .return_copies(&token, &book, qty)
        .await?;
    Ok(Json(settlement.into()))
}
