use quill_db::models::PostRow;
use quill_types::api::{CurrentUser, Identity};

/// Outcome of an authorization check: continue handling, or send the
/// client somewhere else. Pure data — no side effects here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    Redirect(&'static str),
}

/// Anonymous requests are sent to the login page.
pub fn must_be_logged_in(identity: &Identity) -> Gate {
    match identity {
        Identity::Authenticated { .. } => Gate::Proceed,
        Identity::Anonymous => Gate::Redirect("/login"),
    }
}

/// An absent post and a post owned by someone else gate identically, so a
/// non-owner cannot probe which ids exist.
pub fn must_be_owner(user: &CurrentUser, post: Option<&PostRow>) -> Gate {
    match post {
        Some(post) if post.author_id == user.id => Gate::Proceed,
        _ => Gate::Redirect("/"),
    }
}
