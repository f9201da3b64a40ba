use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            body        TEXT NOT NULL,
            author_id   INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_author
            ON posts(author_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
