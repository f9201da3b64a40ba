use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::models::{PostDetailRow, PostRow, UserRow};
use crate::{Database, InsertUserError};

impl Database {
    // -- Users --

    /// Insert a new user. The UNIQUE constraint on `username` decides the
    /// duplicate-registration race: a constraint violation on this INSERT
    /// maps to `DuplicateUsername`, everything else is a DB failure.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRow, InsertUserError> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            ) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    return Err(InsertUserError::DuplicateUsername);
                }
                Err(e) => return Err(InsertUserError::Db(e.into())),
            }

            let id = conn.last_insert_rowid();
            query_user_by_id(conn, id)
                .map_err(InsertUserError::Db)?
                .ok_or_else(|| InsertUserError::Db(anyhow!("inserted user {} not found", id)))
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Posts --

    /// Insert a post and return its id. `author_id` is set here and never
    /// updated afterwards.
    pub fn create_post(
        &self,
        title: &str,
        body: &str,
        author_id: i64,
        created_at: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (title, body, author_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, body, author_id, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_post_by_id(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, body, author_id, created_at FROM posts WHERE id = ?1",
            )?;

            let row = stmt
                .query_row([id], |row| {
                    Ok(PostRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        author_id: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    pub fn get_post_with_author(&self, id: i64) -> Result<Option<PostDetailRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.title, p.body, p.author_id, u.username, p.created_at
                 FROM posts p
                 LEFT JOIN users u ON p.author_id = u.id
                 WHERE p.id = ?1",
            )?;

            let row = stmt
                .query_row([id], |row| {
                    Ok(PostDetailRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        author_id: row.get(3)?,
                        author_username: row
                            .get::<_, Option<String>>(4)?
                            .unwrap_or_else(|| "unknown".to_string()),
                        created_at: row.get(5)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    pub fn list_posts_by_author(&self, author_id: i64) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, body, author_id, created_at
                 FROM posts
                 WHERE author_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;

            let rows = stmt
                .query_map([author_id], |row| {
                    Ok(PostRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        author_id: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Update title and body only — authorship is immutable.
    pub fn update_post(&self, id: i64, title: &str, body: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE posts SET title = ?1, body = ?2 WHERE id = ?3",
                rusqlite::params![title, body, id],
            )?;
            Ok(())
        })
    }

    /// Permanent delete; there is no soft-delete.
    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_look_up_user() {
        let db = test_db();
        let user = db.create_user("alice", "phc-digest").unwrap();
        assert_eq!(user.username, "alice");

        let found = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password, "phc-digest");

        assert!(db.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn user_ids_are_monotonic() {
        let db = test_db();
        let a = db.create_user("alice", "h1").unwrap();
        let b = db.create_user("bob", "h2").unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn duplicate_username_rejected() {
        let db = test_db();
        db.create_user("alice", "h1").unwrap();

        match db.create_user("alice", "h2") {
            Err(InsertUserError::DuplicateUsername) => {}
            other => panic!("expected DuplicateUsername, got {:?}", other.map(|u| u.id)),
        }
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let db = Arc::new(test_db());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || db.create_user("alice", "h").map(|u| u.id))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(InsertUserError::DuplicateUsername)))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn post_roundtrip_and_author_immutability() {
        let db = test_db();
        let alice = db.create_user("alice", "h").unwrap();

        let id = db
            .create_post("Hello", "World", alice.id, "2026-01-01T00:00:00+00:00")
            .unwrap();

        let post = db.get_post_by_id(id).unwrap().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author_id, alice.id);

        db.update_post(id, "Hi", "Updated body").unwrap();
        let post = db.get_post_by_id(id).unwrap().unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.body, "Updated body");
        assert_eq!(post.author_id, alice.id);

        db.delete_post(id).unwrap();
        assert!(db.get_post_by_id(id).unwrap().is_none());
    }

    #[test]
    fn post_detail_joins_author_username() {
        let db = test_db();
        let alice = db.create_user("alice", "h").unwrap();
        let id = db
            .create_post("Hello", "World", alice.id, "2026-01-01T00:00:00+00:00")
            .unwrap();

        let detail = db.get_post_with_author(id).unwrap().unwrap();
        assert_eq!(detail.author_username, "alice");

        assert!(db.get_post_with_author(id + 1).unwrap().is_none());
    }

    #[test]
    fn list_posts_newest_first() {
        let db = test_db();
        let alice = db.create_user("alice", "h").unwrap();
        let bob = db.create_user("bob", "h").unwrap();

        db.create_post("first", "b", alice.id, "2026-01-01T00:00:00+00:00")
            .unwrap();
        db.create_post("second", "b", alice.id, "2026-01-02T00:00:00+00:00")
            .unwrap();
        db.create_post("other", "b", bob.id, "2026-01-03T00:00:00+00:00")
            .unwrap();

        let posts = db.list_posts_by_author(alice.id).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }
}
