//! Catalog query service.
//!
//! Stateless: every operation is a fresh round-trip through the gateway and
//! nothing is cached between calls. Search, filtering and pagination all
//! happen server-side.

use crate::{
    error::AppResult,
    gateway::ApiGateway,
    models::{Book, BookPage, BookQuery, BorrowRecord, SessionToken},
};

#[derive(Clone)]
pub struct CatalogService {
    gateway: ApiGateway,
}

impl CatalogService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// One page of the catalog, filtered by a server-side substring search
    /// over title/author/ISBN. Page and limit are clamped to at least 1.
    pub async fn list_books(&self, token: &SessionToken, query: &BookQuery) -> AppResult<BookPage> {
        let params = [
            ("page", query.page.max(1).to_string()),
            ("limit", query.limit.max(1).to_string()),
            ("search", query.search.clone()),
        ];
        self.gateway.get("/v1/books", &params, Some(token)).await
    }

    /// Single book record. A remote 404 propagates so the caller can render
    /// a terminal not-found view; there is nothing to retry.
    pub async fn get_book(&self, token: &SessionToken, id: &str) -> AppResult<Book> {
        self.gateway
            .get(&format!("/v1/books/{}", id), &[], Some(token))
            .await
    }

    /// Whether the session's user holds an open loan against this book.
    /// Drives the choice between borrow and return controls on the detail
    /// view.
    pub async fn user_has_open_loan(&self, token: &SessionToken, id: &str) -> AppResult<bool> {
        let records: Vec<BorrowRecord> = self
            .gateway
            .get(&format!("/v1/books/{}/borrows", id), &[], Some(token))
            .await?;
        Ok(records.iter().any(BorrowRecord::is_open))
    }
}
