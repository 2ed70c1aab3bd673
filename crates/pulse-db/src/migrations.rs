use anyhow::Result;
use pulse_types::Catalog;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                      TEXT PRIMARY KEY,
            name                    TEXT NOT NULL,
            email                   TEXT NOT NULL UNIQUE,
            password                TEXT NOT NULL,
            role                    TEXT NOT NULL,
            photo                   TEXT,
            notifications_enabled   INTEGER NOT NULL DEFAULT 1,
            created_at              TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS movies (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            genre           TEXT NOT NULL,
            category        TEXT NOT NULL,
            director        TEXT NOT NULL,
            release_type    TEXT NOT NULL,
            base_rating     REAL NOT NULL,
            position        INTEGER NOT NULL
        );

        -- movie_id is not a foreign key; reviews may point at retired titles.
        CREATE TABLE IF NOT EXISTS feedback (
            id          TEXT PRIMARY KEY,
            movie_id    TEXT NOT NULL,
            user_id     TEXT NOT NULL,
            user_name   TEXT NOT NULL,
            rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            text        TEXT NOT NULL DEFAULT '',
            sentiment   TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_created
            ON feedback(created_at);
        ",
    )?;

    seed_movies(conn)?;

    info!("Database migrations complete");
    Ok(())
}

fn seed_movies(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO movies (id, title, genre, category, director, release_type, base_rating, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (position, movie) in Catalog::seeded().entries().iter().enumerate() {
        stmt.execute(rusqlite::params![
            movie.id,
            movie.title,
            movie.genre,
            movie.category.as_str(),
            movie.director,
            movie.release_type.as_str(),
            f64::from(movie.base_rating),
            position as i64,
        ])?;
    }
    Ok(())
}
