//! Login, registration and logout handlers.
//!
//! Login success sets the session cookie and redirects into the catalog;
//! failures stay on the form with in-page messages. Only credential
//! verification failures on protected routes redirect — a wrong password is
//! an ordinary in-page rejection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    forms::{self, FieldSpec},
    models::Credentials,
    AppState,
};

use super::session;

/// View-model for a credential form page
#[derive(Serialize)]
pub struct FormView {
    pub title: &'static str,
    pub action: &'static str,
    pub fields: &'static [FieldSpec],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn form_view(title: &'static str, action: &'static str, fields: &'static [FieldSpec]) -> FormView {
    FormView {
        title,
        action,
        fields,
        errors: Vec::new(),
    }
}

fn form_failure(mut view: FormView, errors: Vec<String>) -> Response {
    view.errors = errors;
    (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
}

pub async fn login_form() -> Json<FormView> {
    Json(form_view("Sign in", "/login", forms::LOGIN_FIELDS))
}

pub async fn register_form() -> Json<FormView> {
    Json(form_view("Create account", "/register", forms::REGISTER_FIELDS))
}

#[derive(Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialForm {
    fn validate(&self, fields: &[FieldSpec]) -> Vec<String> {
        forms::validate_values(
            fields,
            &[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ],
        )
    }

    fn into_credentials(self) -> Credentials {
        Credentials {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialForm>,
) -> AppResult<Response> {
    let errors = form.validate(forms::LOGIN_FIELDS);
    if !errors.is_empty() {
        return Ok(form_failure(
            form_view("Sign in", "/login", forms::LOGIN_FIELDS),
            errors,
        ));
    }

    match state.services.auth.login(&form.into_credentials()).await {
        Ok(token) => {
            let jar = jar.add(session::session_cookie(
                &token.access_token,
                state.config.session.secure,
            ));
            Ok((jar, Redirect::to("/library")).into_response())
        }
        Err(error) => Ok(form_failure(
            form_view("Sign in", "/login", forms::LOGIN_FIELDS),
            error.user_messages(),
        )),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialForm>,
) -> AppResult<Response> {
    let errors = form.validate(forms::REGISTER_FIELDS);
    if !errors.is_empty() {
        return Ok(form_failure(
            form_view("Create account", "/register", forms::REGISTER_FIELDS),
            errors,
        ));
    }

    match state.services.auth.register(&form.into_credentials()).await {
        Ok(()) => Ok(Redirect::to("/login").into_response()),
        Err(error) => Ok(form_failure(
            form_view("Create account", "/register", forms::REGISTER_FIELDS),
            error.user_messages(),
        )),
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(session::expired_session_cookie());
    (jar, Redirect::to("/login")).into_response()
}
