//! Catalog record create/edit/delete handlers.
//!
//! Form submissions arrive as multipart (fields plus the optional cover
//! file). Local validation failures and server rejections both land back on
//! the form view with messages; successes redirect.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    forms::{self, FieldSpec},
    models::{Book, BookFields, CoverUpload},
    AppState,
};

use super::session::Session;

/// View-model for the book create/edit form
#[derive(Serialize)]
pub struct BookFormView {
    pub title: &'static str,
    pub action: String,
    pub fields: &'static [FieldSpec],
    /// Current record values when editing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn form_view(title: &'static str, action: String, book: Option<Book>) -> BookFormView {
    BookFormView {
        title,
        action,
        fields: forms::BOOK_FIELDS,
        book,
        errors: Vec::new(),
    }
}

fn form_failure(mut view: BookFormView, errors: Vec<String>) -> Response {
    view.errors = errors;
    (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
}

pub async fn new_book_form() -> Json<BookFormView> {
    Json(form_view("Add New Book", "/library/new".to_string(), None))
}

pub async fn edit_book_form(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
) -> AppResult<Json<BookFormView>> {
    let book = state.services.catalog.get_book(&token, &id).await?;
    Ok(Json(form_view(
        "Edit Book",
        format!("/library/{}/edit", id),
        Some(book),
    )))
}

pub async fn create_book(
    State(state): State<AppState>,
    Session(token): Session,
    multipart: Multipart,
) -> AppResult<Response> {
    let view = || form_view("Add New Book", "/library/new".to_string(), None);

    let (fields, cover) = match read_book_form(multipart).await {
        Ok(parsed) => parsed,
        Err(error) => return Ok(form_failure(view(), error.user_messages())),
    };

    match state.services.records.create_book(&token, fields, cover).await {
        Ok(_book) => Ok(Redirect::to("/library").into_response()),
        Err(error @ AppError::Authentication(_)) => Err(error),
        Err(error) => Ok(form_failure(view(), error.user_messages())),
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let action = format!("/library/{}/edit", id);
    let view = |action: String| form_view("Edit Book", action, None);

    let (fields, cover) = match read_book_form(multipart).await {
        Ok(parsed) => parsed,
        Err(error) => return Ok(form_failure(view(action), error.user_messages())),
    };

    match state
        .services
        .records
        .update_book(&token, &id, fields, cover)
        .await
    {
        Ok(book) => Ok(Redirect::to(&format!("/library/{}", book.id)).into_response()),
        Err(error @ AppError::Authentication(_)) => Err(error),
        Err(error) => Ok(form_failure(view(action), error.user_messages())),
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    Session(token): Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.services.records.delete_book(&token, &id).await?;
    Ok(Redirect::to("/library").into_response())
}

/// Decode the multipart submission into field values and the optional cover.
/// Descriptor-level validation runs before the typed payload is built, so a
/// submission with a blank title or a non-numeric year never constructs a
/// `BookFields`.
async fn read_book_form(
    mut multipart: Multipart,
) -> AppResult<(BookFields, Option<CoverUpload>)> {
    let mut values: HashMap<String, String> = HashMap::new();
    let mut cover: Option<CoverUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "cover" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(malformed)?;
            if !file_name.is_empty() && !bytes.is_empty() {
                cover = Some(CoverUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let text = field.text().await.map_err(malformed)?;
            values.insert(name, text);
        }
    }

    let pairs: Vec<(&str, &str)> = values
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let errors = forms::validate_values(forms::BOOK_FIELDS, &pairs);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let publication_year = values
        .get("publicationYear")
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| AppError::validation("Publication Year must be a number"))?;
    let total_quantity = values
        .get("totalQuantity")
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| AppError::validation("Total Quantity must be a number"))?;

    let mut take = |name: &str| values.remove(name).unwrap_or_default();
    let fields = BookFields {
        title: take("title"),
        author: take("author"),
        description: take("description"),
        isbn: take("ISBN"),
        publication_year,
        total_quantity,
    };

    Ok((fields, cover))
}

fn malformed(error: axum_extra::extract::multipart::MultipartError) -> AppError {
    tracing::debug!("Malformed multipart submission: {}", error);
    AppError::validation("Malformed form submission")
}
