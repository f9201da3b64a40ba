use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::identity;
use crate::posts;

/// Assemble the application router. The identity middleware wraps every
/// route; the auth gate wraps only the post routes.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(posts::home))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout));

    let protected = Router::new()
        .route("/create-post", post(posts::create_post))
        .route("/post/{id}", get(posts::view_post))
        .route(
            "/edit-post/{id}",
            get(posts::edit_form).post(posts::update_post),
        )
        .route("/delete-post/{id}", post(posts::delete_post))
        .layer(middleware::from_fn(identity::require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::attach_identity,
        ))
        .with_state(state)
}
