use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tracing::warn;

use quill_db::models::{PostDetailRow, PostRow};
use quill_types::api::{CurrentUser, EditPage, HomePage, Identity, PostForm, PostPage};
use quill_types::models::Post;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::guard::{self, Gate};
use crate::validate;

/// GET / — the signed-in user's own posts, newest first; anonymous
/// visitors get an empty page shell.
pub async fn home(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    let page = match identity {
        Identity::Authenticated { user_id, username } => {
            let posts = state
                .db
                .list_posts_by_author(user_id)?
                .into_iter()
                .map(post_from_row)
                .collect();

            HomePage {
                user: Some(username),
                posts,
            }
        }
        Identity::Anonymous => HomePage {
            user: None,
            posts: Vec::new(),
        },
    };

    Ok(Json(page).into_response())
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let (title, body) =
        validate::validate_post_fields(&form.title, &form.body).map_err(ApiError::Validation)?;

    let id = state
        .db
        .create_post(&title, &body, user.id, &Utc::now().to_rfc3339())?;

    Ok(Redirect::to(&format!("/post/{}", id)).into_response())
}

/// GET /post/{id} — any signed-in user may read any post; a missing post
/// redirects home.
pub async fn view_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let Some(post) = state.db.get_post_with_author(id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    let is_author = post.author_id == user.id;

    Ok(Json(PostPage {
        post: post_from_detail(post),
        is_author,
    })
    .into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = state.db.get_post_by_id(id)?;

    if let Gate::Redirect(target) = guard::must_be_owner(&user, post.as_ref()) {
        return Ok(Redirect::to(target).into_response());
    }
    let Some(post) = post else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(Json(EditPage {
        post: post_from_row(post),
    })
    .into_response())
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let post = state.db.get_post_by_id(id)?;

    if let Gate::Redirect(target) = guard::must_be_owner(&user, post.as_ref()) {
        return Ok(Redirect::to(target).into_response());
    }

    let (title, body) =
        validate::validate_post_fields(&form.title, &form.body).map_err(ApiError::Validation)?;

    // title and body only — author_id never changes
    state.db.update_post(id, &title, &body)?;

    Ok(Redirect::to(&format!("/post/{}", id)).into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = state.db.get_post_by_id(id)?;

    if let Gate::Redirect(target) = guard::must_be_owner(&user, post.as_ref()) {
        return Ok(Redirect::to(target).into_response());
    }

    state.db.delete_post(id)?;

    Ok(Redirect::to("/").into_response())
}

fn parse_timestamp(raw: &str, post_id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!("Corrupt created_at '{}' on post {}: {}", raw, post_id, e);
        DateTime::default()
    })
}

fn post_from_row(row: PostRow) -> Post {
    let created_at = parse_timestamp(&row.created_at, row.id);
    Post {
        id: row.id,
        title: row.title,
        body: row.body,
        author_id: row.author_id,
        author_username: None,
        created_at,
    }
}

fn post_from_detail(row: PostDetailRow) -> Post {
    let created_at = parse_timestamp(&row.created_at, row.id);
    Post {
        id: row.id,
        title: row.title,
        body: row.body,
        author_id: row.author_id,
        author_username: Some(row.author_username),
        created_at,
    }
}
