//! Data models for the Lectern web client

pub mod auth;
pub mod book;
pub mod borrow;

pub use auth::{AccessToken, Credentials, SessionToken};
pub use book::{Book, BookFields, BookPage, BookQuery, CoverImage, CoverUpload, PageMeta};
pub use borrow::BorrowRecord;
