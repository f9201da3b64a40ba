use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use quill_types::api::{CurrentUser, Identity};

use crate::auth::AppState;
use crate::guard::{self, Gate};
use crate::token::TokenOutcome;

/// Cookie carrying the session token. httpOnly + secure + SameSite=Strict;
/// set on register/login, cleared on logout.
pub const SESSION_COOKIE: &str = "quill_session";

/// Runs on every request: verify the session cookie and attach an
/// `Identity` to the request extensions. A missing, malformed or expired
/// token means `Anonymous` — this middleware never rejects a request.
pub async fn attach_identity(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match jar.get(SESSION_COOKIE) {
        Some(cookie) => match state.tokens.verify(cookie.value()) {
            TokenOutcome::Valid(claims) => Identity::Authenticated {
                user_id: claims.sub,
                username: claims.username,
            },
            TokenOutcome::Invalid => Identity::Anonymous,
        },
        None => Identity::Anonymous,
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Layered onto protected routes. Applies the logged-in gate and, on pass,
/// inserts a `CurrentUser` so handlers can extract it infallibly.
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or(Identity::Anonymous);

    match guard::must_be_logged_in(&identity) {
        Gate::Proceed => {}
        Gate::Redirect(target) => return Redirect::to(target).into_response(),
    }

    if let Identity::Authenticated { user_id, username } = identity {
        req.extensions_mut().insert(CurrentUser {
            id: user_id,
            username,
        });
    }

    next.run(req).await
}
