/// Database row types — these map directly to SQLite rows.
/// Distinct from the quill-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub created_at: String,
}

/// A post joined with its author's username, for single-post pages.
pub struct PostDetailRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: String,
}
