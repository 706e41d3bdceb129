//! Borrow (loan) record model.
//!
//! Borrow records are read-only from the client's perspective: the API
//! creates them on a borrow mutation and closes them on a return mutation.
//! The client only reads them to derive the open-loan flag for a book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Borrowing user, as embedded in a borrow record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrower {
    pub id: String,
    pub username: String,
}

/// Borrowed book, as embedded in a borrow record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowedBook {
    pub id: String,
    pub title: String,
    pub author: String,
}

/// One loan of one or more copies of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub id: String,
    pub user: Borrower,
    pub book: BorrowedBook,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BorrowRecord {
    /// A null return timestamp signals an outstanding loan
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}
