use crate::models::{FeedbackRow, MovieRow, UserRow};
use crate::Database;
use anyhow::Result;
use pulse_types::FeedbackRecord;
use rusqlite::Connection;

/// Fields for a new account; `password_hash` is already hashed.
pub struct NewUser<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password, role) VALUES (?1, ?2, ?3, ?4, ?5)",
                (user.id, user.name, user.email, user.password_hash, user.role),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    // -- Movies --

    pub fn list_movies(&self) -> Result<Vec<MovieRow>> {
        self.with_conn(query_movies)
    }

    // -- Feedback --

    pub fn insert_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO feedback (id, movie_id, user_id, user_name, rating, text, sentiment, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    record.id,
                    record.movie_id,
                    record.user_id,
                    record.user_name,
                    i64::from(record.rating().get()),
                    record.text,
                    record.sentiment().as_str(),
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Newest first.
    pub fn list_feedback(&self) -> Result<Vec<FeedbackRow>> {
        self.with_conn(query_feedback)
    }

    /// Returns false when no row has `id`.
    pub fn update_feedback(&self, id: &str, rating: i64, text: &str, sentiment: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE feedback SET rating = ?1, text = ?2, sentiment = ?3 WHERE id = ?4",
                rusqlite::params![rating, text, sentiment, id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Returns false when no row has `id`.
    pub fn delete_feedback(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM feedback WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password, role, photo, notifications_enabled, created_at
         FROM users WHERE email = ?1",
    )?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                role: row.get(4)?,
                photo: row.get(5)?,
                notifications_enabled: row.get(6)?,
                created_at: row.get(7)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_movies(conn: &Connection) -> Result<Vec<MovieRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, genre, category, director, release_type, base_rating
         FROM movies ORDER BY position",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MovieRow {
                id: row.get(0)?,
                title: row.get(1)?,
                genre: row.get(2)?,
                category: row.get(3)?,
                director: row.get(4)?,
                release_type: row.get(5)?,
                base_rating: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_feedback(conn: &Connection) -> Result<Vec<FeedbackRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, movie_id, user_id, user_name, rating, text, sentiment, created_at
         FROM feedback
         ORDER BY created_at DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(FeedbackRow {
                id: row.get(0)?,
                movie_id: row.get(1)?,
                user_id: row.get(2)?,
                user_name: row.get(3)?,
                rating: row.get(4)?,
                text: row.get(5)?,
                sentiment: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
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
