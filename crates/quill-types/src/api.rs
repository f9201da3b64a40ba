use serde::{Deserialize, Serialize};

use crate::models::Post;

// -- Session claims --

/// Claims embedded in every session token. Canonical definition lives here
/// in quill-types so the codec, the middleware and the tests all agree on
/// one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (matches `users.id`).
    pub sub: i64,
    pub username: String,
    /// Absolute expiry, Unix timestamp in seconds.
    pub exp: usize,
}

// -- Request identity --

/// The outcome of verifying a request's session cookie. Attached to every
/// request by the identity middleware; a missing, malformed or expired
/// token degrades to `Anonymous`, never to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated { user_id: i64, username: String },
    Anonymous,
}

/// Inserted by the auth gate once an `Identity::Authenticated` has passed,
/// so protected handlers can extract a user that is guaranteed present.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

// -- Forms --

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

// -- Page payloads --
//
// Handlers expose page data; rendering it is the template layer's concern.

#[derive(Debug, Serialize)]
pub struct HomePage {
    /// Current username, `None` when anonymous.
    pub user: Option<String>,
    /// The signed-in user's own posts, newest first.
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    pub post: Post,
    pub is_author: bool,
}

#[derive(Debug, Serialize)]
pub struct EditPage {
    pub post: Post,
}

/// Field-level messages for a form that failed validation.
#[derive(Debug, Serialize)]
pub struct FormErrors {
    pub errors: Vec<String>,
}
