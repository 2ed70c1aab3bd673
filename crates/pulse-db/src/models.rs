/// Database row types — these map directly to SQLite rows.
/// Distinct from pulse-types models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub photo: Option<String>,
    pub notifications_enabled: bool,
    pub created_at: String,
}

pub struct MovieRow {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub category: String,
    pub director: String,
    pub release_type: String,
    pub base_rating: f64,
}

pub struct FeedbackRow {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: i64,
    pub text: String,
    pub sentiment: String,
    pub created_at: String,
}
