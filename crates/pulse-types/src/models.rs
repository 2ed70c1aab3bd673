use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// -- Ratings & sentiment --

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// 4 and 5 are positive, 3 is neutral, 1 and 2 are negative.
    pub fn classify(rating: Rating) -> Self {
        match rating.get() {
            r if r >= 4 => Self::Positive,
            3 => Self::Neutral,
            _ => Self::Negative,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Feedback --

/// A single review left by an audience member.
///
/// `rating` and `sentiment` are private so the sentiment can never drift from
/// the rating; use [`FeedbackRecord::revise`] to change them. Deserialization
/// re-derives the sentiment and accepts both camelCase and snake_case keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFeedback")]
pub struct FeedbackRecord {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub user_name: String,
    rating: Rating,
    pub text: String,
    pub created_at: DateTime<Utc>,
    sentiment: Sentiment,
}

impl FeedbackRecord {
    pub fn new(
        id: impl Into<String>,
        movie_id: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        rating: Rating,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            movie_id: movie_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            rating,
            text: text.into(),
            created_at,
            sentiment: Sentiment::classify(rating),
        }
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    /// Replace rating and text; id, author and timestamp are untouched.
    pub fn revise(&mut self, rating: Rating, text: impl Into<String>) {
        self.rating = rating;
        self.text = text.into();
        self.sentiment = Sentiment::classify(rating);
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeedback {
    id: String,
    #[serde(alias = "movie_id")]
    movie_id: String,
    #[serde(alias = "user_id")]
    user_id: String,
    #[serde(alias = "user_name")]
    user_name: String,
    rating: i64,
    #[serde(default)]
    text: String,
    #[serde(alias = "created_at")]
    created_at: DateTime<Utc>,
}

impl TryFrom<RawFeedback> for FeedbackRecord {
    type Error = ValidationError;

    fn try_from(raw: RawFeedback) -> Result<Self, Self::Error> {
        Ok(Self::new(
            raw.id,
            raw.movie_id,
            raw.user_id,
            raw.user_name,
            Rating::new(raw.rating)?,
            raw.text,
            raw.created_at,
        ))
    }
}

/// Narrows a feedback listing by movie and/or an inclusive UTC date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub movie_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FeedbackFilter {
    pub fn for_movie(movie_id: impl Into<String>) -> Self {
        Self {
            movie_id: Some(movie_id.into()),
            ..Self::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        if let Some(movie_id) = &self.movie_id {
            if &record.movie_id != movie_id {
                return false;
            }
        }
        let day = record.created_on();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }
}

// -- Catalog --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tamil,
    English,
    #[serde(rename = "K-Drama")]
    KDrama,
    Animation,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Tamil, Self::English, Self::KDrama, Self::Animation];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tamil => "Tamil",
            Self::English => "English",
            Self::KDrama => "K-Drama",
            Self::Animation => "Animation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseType {
    Theatre,
    #[serde(rename = "OTT")]
    Ott,
}

impl ReleaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theatre => "Theatre",
            Self::Ott => "OTT",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Theatre" => Ok(Self::Theatre),
            "OTT" => Ok(Self::Ott),
            other => Err(ValidationError::UnknownReleaseType(other.to_string())),
        }
    }
}

/// Static movie reference data. Visibility and featuring live in an overlay,
/// never on the entry itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub category: Category,
    pub director: String,
    pub release_type: ReleaseType,
    pub base_rating: f32,
}

impl CatalogEntry {
    /// Animation titles are filed under other categories too; the genre decides.
    pub fn is_animation(&self) -> bool {
        self.category == Category::Animation || self.genre.contains("Animation")
    }
}

// -- Identity --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Audience member.
    User,
    Producer,
    Analyst,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Self::User, Self::Producer, Self::Analyst, Self::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Producer => "producer",
            Self::Analyst => "analyst",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRole(s.to_string()))
    }
}

/// The signed-in profile for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub role: Role,
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

fn default_notifications() -> bool {
    true
}
