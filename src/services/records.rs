//! Catalog record mutation service.
//!
//! Create/update/delete of book records. Create and update carry exactly one
//! cover image part; when the user supplied none, an empty placeholder is
//! substituted so the multipart shape is uniform. There is no local draft
//! persistence — an abandoned edit is simply lost.

use reqwest::multipart::{Form, Part};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    gateway::ApiGateway,
    models::{Book, BookFields, CoverUpload, SessionToken},
};

#[derive(Clone)]
pub struct RecordsService {
    gateway: ApiGateway,
}

impl RecordsService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Create a book record. Returns the stored record
    pub async fn create_book(
        &self,
        token: &SessionToken,
        fields: BookFields,
        cover: Option<CoverUpload>,
    ) -> AppResult<Book> {
        let form = prepare(fields, cover)?;
        self.gateway
            .post_multipart("/v1/books", form, Some(token))
            .await
    }

    /// Replace a book record's editable fields
    pub async fn update_book(
        &self,
        token: &SessionToken,
        id: &str,
        fields: BookFields,
        cover: Option<CoverUpload>,
    ) -> AppResult<Book> {
        let form = prepare(fields, cover)?;
        self.gateway
            .put_multipart(&format!("/v1/books/{}", id), form, Some(token))
            .await
    }

    /// Delete a book record
    pub async fn delete_book(&self, token: &SessionToken, id: &str) -> AppResult<()> {
        self.gateway
            .delete(&format!("/v1/books/{}", id), Some(token))
            .await
    }
}

/// Validate fields and cover locally, then build the multipart payload.
/// Local failures never reach the network layer.
fn prepare(fields: BookFields, cover: Option<CoverUpload>) -> AppResult<Form> {
    let fields = fields.normalized();
    fields.validate()?;

    let cover = match cover {
        Some(cover) => {
            cover.validate().map_err(AppError::validation)?;
            cover
        }
        None => CoverUpload::placeholder(),
    };

    multipart_form(&fields, cover)
}

fn multipart_form(fields: &BookFields, cover: CoverUpload) -> AppResult<Form> {
    let cover_part = Part::bytes(cover.bytes)
        .file_name(cover.file_name)
        .mime_str(&cover.content_type)?;

    Ok(Form::new()
        .text("title", fields.title.clone())
        .text("description", fields.description.clone())
        .text("author", fields.author.clone())
        .text("totalQuantity", fields.total_quantity.to_string())
        .text("ISBN", fields.isbn.clone())
        .text("publicationYear", fields.publication_year.to_string())
        .part("cover", cover_part))
}
