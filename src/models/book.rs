//! Book (catalog entry) model and related types.
//!
//! Wire shapes match the catalog API's JSON: camelCase field names, `ISBN`
//! fully capitalized, timestamps as RFC 3339. The `availableQuantity <=
//! totalQuantity` invariant is owned by the API server; the client only ever
//! displays what it last fetched and never recomputes availability locally.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Cover image as stored by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    pub path: String,
}

/// Full book record as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub publication_year: i32,
    pub total_quantity: i64,
    pub available_quantity: i64,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
}

/// Pagination metadata, round-tripped back into the next query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub skip: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

/// One page of the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPage {
    pub data: Vec<Book>,
    pub meta: PageMeta,
}

/// Listing query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct BookQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: String::new(),
        }
    }
}

/// Editable book fields for create/update submissions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ISBN")]
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(custom(function = validate_publication_year))]
    pub publication_year: i32,
    #[validate(range(min = 1, message = "Total quantity must be at least 1"))]
    pub total_quantity: i64,
}

impl BookFields {
    /// Trim whitespace from free-text fields before validation
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self.description = self.description.trim().to_string();
        self.isbn = self.isbn.trim().to_string();
        self
    }
}

/// Publication years are accepted up to one year ahead of the current year,
/// to cover announced-but-unreleased editions.
fn validate_publication_year(year: i32) -> Result<(), ValidationError> {
    let max = Utc::now().year() + 1;
    if year < 1000 || year > max {
        let mut error = ValidationError::new("publication_year");
        error.message = Some("Please enter a valid publication year".into());
        return Err(error);
    }
    Ok(())
}

/// Maximum accepted cover image size
pub const MAX_COVER_BYTES: usize = 10 * 1024 * 1024;

/// A cover image file submitted with a create/update form
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl CoverUpload {
    /// Empty stand-in sent when no cover was supplied, so the multipart
    /// shape is the same for every submission.
    pub fn placeholder() -> Self {
        Self {
            file_name: "placeholder.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.content_type.starts_with("image/") {
            return Err("Please select a valid image file".to_string());
        }
        if self.bytes.len() > MAX_COVER_BYTES {
            return Err("Image size must be less than 10MB".to_string());
        }
        Ok(())
    }
}
