pub mod auth;
pub mod error;
pub mod guard;
pub mod identity;
pub mod password;
pub mod posts;
pub mod routes;
pub mod token;
pub mod validate;

pub use auth::{AppState, AppStateInner};
