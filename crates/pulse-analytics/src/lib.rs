//! Derivation engine: stateless aggregate statistics over a feedback snapshot.
//!
//! Every function takes any iterator of borrowed records, so callers can feed
//! a store slice, a filtered view, or a single title's reviews without copying.

pub mod breakdown;
pub mod ratings;
pub mod reports;
pub mod search;
pub mod timeline;

pub use breakdown::{ClassShare, SentimentBreakdown, sentiment_breakdown};
pub use ratings::{average_rating, rating_distribution};
pub use reports::{
    AnalystOverview, AudienceSplit, BudgetTier, Fatigue, MovieComparison, MovieReport,
    RiskIndicators, Virality, WordOfMouth, analyst_overview, compare, movie_report,
};
pub use search::search;
pub use timeline::{DayBucket, MAX_TIMELINE_DAYS, TIMELINE_DAYS, time_series};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use pulse_types::{FeedbackRecord, Rating};

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    pub fn review(id: &str, movie: &str, rating: i64, created_at: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord::new(
            id,
            movie,
            "u1",
            "Asha",
            Rating::new(rating).unwrap(),
            format!("review {id}"),
            created_at,
        )
    }

    pub fn ratings(movie: &str, ratings: &[i64]) -> Vec<FeedbackRecord> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| review(&format!("{movie}-{i}"), movie, r, at(2024, 6, 1, 12)))
            .collect()
    }
}
