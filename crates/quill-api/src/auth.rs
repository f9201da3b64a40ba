use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use quill_db::{Database, InsertUserError};
use quill_types::api::{LoginForm, RegisterForm};

use crate::error::ApiError;
use crate::identity::SESSION_COOKIE;
use crate::token::TokenCodec;
use crate::{password, validate};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenCodec,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let (username, mut errors) = validate::validate_username(&form.username);
    errors.extend(validate::validate_password(&form.password));

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Advisory pre-check for friendlier messaging only — under concurrency
    // the UNIQUE constraint on the INSERT below is the arbiter.
    if state.db.get_user_by_username(&username)?.is_some() {
        return Err(ApiError::DuplicateUsername);
    }

    let digest = password::hash(&form.password)?;

    let user = match state.db.create_user(&username, &digest) {
        Ok(user) => user,
        Err(InsertUserError::DuplicateUsername) => return Err(ApiError::DuplicateUsername),
        Err(InsertUserError::Db(e)) => return Err(e.into()),
    };

    let token = state.tokens.issue(user.id, &user.username)?;
    Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    let user = state
        .db
        .get_user_by_username(username)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify(&form.password, &user.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, &user.username)?;
    Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
}

/// Clears the cookie; no server-side state exists to tear down.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}
