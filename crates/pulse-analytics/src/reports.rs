use chrono::NaiveDate;
use pulse_types::{CatalogEntry, Category, FeedbackRecord};
use serde::Serialize;

use crate::breakdown::{SentimentBreakdown, sentiment_breakdown};
use crate::ratings::average_rating;
use crate::timeline::{DayBucket, TIMELINE_DAYS, time_series};

// -- Analyst --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalystOverview {
    pub total: usize,
    pub average_rating: f64,
    pub breakdown: SentimentBreakdown,
    pub timeline: Vec<DayBucket>,
}

pub fn analyst_overview<'a, I>(records: I, today: NaiveDate) -> AnalystOverview
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let records: Vec<&FeedbackRecord> = records.into_iter().collect();
    AnalystOverview {
        total: records.len(),
        average_rating: average_rating(records.iter().copied()),
        breakdown: sentiment_breakdown(records.iter().copied()),
        timeline: time_series(records.iter().copied(), TIMELINE_DAYS, today),
    }
}

// -- Producer --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetTier {
    High,
    Medium,
    Low,
}

impl BudgetTier {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::English => Self::High,
            Category::Tamil => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WordOfMouth {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Virality {
    Stable,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Fatigue {
    Low,
    Moderate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskIndicators {
    /// High when fewer than 40% of reviews are positive.
    pub word_of_mouth: WordOfMouth,
    /// Excellent past five reviews with more than 70% positive.
    pub virality: Virality,
    /// Moderate past twenty reviews.
    pub fatigue: Fatigue,
}

impl RiskIndicators {
    fn assess(total: usize, love: u32) -> Self {
        Self {
            word_of_mouth: if love < 40 {
                WordOfMouth::High
            } else {
                WordOfMouth::Low
            },
            virality: if total > 5 && love > 70 {
                Virality::Excellent
            } else {
                Virality::Stable
            },
            fatigue: if total > 20 {
                Fatigue::Moderate
            } else {
                Fatigue::Low
            },
        }
    }
}

/// Rule-based audience mix, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudienceSplit {
    pub youth: f64,
    pub family: f64,
    pub mass: f64,
}

impl AudienceSplit {
    fn derive(total: usize, love: u32) -> Self {
        let youth = 40.0 + f64::from(love) / 4.0;
        let family = 30.0 + (total % 20) as f64;
        Self {
            youth,
            family,
            mass: (100.0 - youth - family).max(0.0),
        }
    }
}

/// Producer dashboard metrics for one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieReport {
    pub movie_id: String,
    pub title: String,
    pub total: usize,
    pub average_rating: f64,
    pub breakdown: SentimentBreakdown,
    /// Share of positive reviews.
    pub love_percentage: u32,
    /// `min(100, total * 12 + love / 2)`.
    pub engagement_score: f64,
    pub budget_tier: BudgetTier,
    pub audience_split: AudienceSplit,
    pub risks: RiskIndicators,
}

/// Build the report for `entry`; records for other titles are ignored.
pub fn movie_report<'a, I>(entry: &CatalogEntry, records: I) -> MovieReport
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let own: Vec<&FeedbackRecord> = records
        .into_iter()
        .filter(|r| r.movie_id == entry.id)
        .collect();
    let total = own.len();
    let breakdown = sentiment_breakdown(own.iter().copied());
    let love = breakdown.positive.percent;

    MovieReport {
        movie_id: entry.id.clone(),
        title: entry.title.clone(),
        total,
        average_rating: average_rating(own.iter().copied()),
        breakdown,
        love_percentage: love,
        engagement_score: (total as f64 * 12.0 + f64::from(love) / 2.0).min(100.0),
        budget_tier: BudgetTier::for_category(entry.category),
        audience_split: AudienceSplit::derive(total, love),
        risks: RiskIndicators::assess(total, love),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieComparison {
    pub left: MovieReport,
    pub right: MovieReport,
    /// Left minus right.
    pub total_delta: i64,
    pub love_delta: i64,
    pub engagement_delta: f64,
}

pub fn compare(left: MovieReport, right: MovieReport) -> MovieComparison {
    MovieComparison {
        total_delta: left.total as i64 - right.total as i64,
        love_delta: i64::from(left.love_percentage) - i64::from(right.love_percentage),
        engagement_delta: left.engagement_score - right.engagement_score,
        left,
        right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, ratings, review};
    use pulse_types::Catalog;

    fn entry(id: &str) -> CatalogEntry {
        Catalog::seeded().find(id).cloned().unwrap()
    }

    #[test]
    fn report_for_unreviewed_title() {
        let report = movie_report(&entry("k2"), std::iter::empty());
        assert_eq!(report.total, 0);
        assert_eq!(report.love_percentage, 0);
        assert_eq!(report.engagement_score, 0.0);
        assert_eq!(report.budget_tier, BudgetTier::Low);
        assert_eq!(report.risks.word_of_mouth, WordOfMouth::High);
        assert_eq!(report.risks.virality, Virality::Stable);
        assert_eq!(report.audience_split.youth, 40.0);
        assert_eq!(report.audience_split.family, 30.0);
        assert_eq!(report.audience_split.mass, 30.0);
    }

    #[test]
    fn report_ignores_other_titles() {
        let mut records = ratings("e1", &[5, 5, 4, 3]);
        records.extend(ratings("e2", &[1, 1, 1]));
        let report = movie_report(&entry("e1"), &records);
        assert_eq!(report.total, 4);
        assert_eq!(report.love_percentage, 75);
        assert_eq!(report.engagement_score, 48.0 + 37.5);
        assert_eq!(report.budget_tier, BudgetTier::High);
        assert_eq!(report.average_rating, 4.3);
    }

    #[test]
    fn viral_hit_with_heavy_volume() {
        let records = ratings("t1", &[5; 21]);
        let report = movie_report(&entry("t1"), &records);
        assert_eq!(report.engagement_score, 100.0);
        assert_eq!(report.budget_tier, BudgetTier::Medium);
        assert_eq!(report.risks.virality, Virality::Excellent);
        assert_eq!(report.risks.fatigue, Fatigue::Moderate);
        assert_eq!(report.risks.word_of_mouth, WordOfMouth::Low);
    }

    #[test]
    fn audience_mass_never_negative() {
        let records = ratings("t1", &[5; 19]);
        let split = movie_report(&entry("t1"), &records).audience_split;
        assert_eq!(split.youth, 65.0);
        assert_eq!(split.family, 49.0);
        assert_eq!(split.mass, 0.0);
    }

    #[test]
    fn compare_reports_deltas() {
        let mut records = ratings("e1", &[5, 5]);
        records.extend(ratings("e2", &[1, 5, 3]));
        let cmp = compare(
            movie_report(&entry("e1"), &records),
            movie_report(&entry("e2"), &records),
        );
        assert_eq!(cmp.total_delta, -1);
        assert_eq!(cmp.love_delta, 100 - 33);
        assert_eq!(cmp.left.movie_id, "e1");
    }

    #[test]
    fn overview_combines_all_metrics() {
        let records = vec![
            review("a", "t1", 5, at(2024, 6, 7, 9)),
            review("b", "t2", 3, at(2024, 6, 6, 9)),
        ];
        let overview = analyst_overview(&records, NaiveDate::from_ymd_opt(2024, 6, 7).unwrap());
        assert_eq!(overview.total, 2);
        assert_eq!(overview.average_rating, 4.0);
        assert_eq!(overview.breakdown.positive.count, 1);
        assert_eq!(overview.timeline.len(), TIMELINE_DAYS as usize);
        assert_eq!(overview.timeline.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn report_serializes_tiers_upper_case() {
        let report = movie_report(&entry("e1"), std::iter::empty());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["budget_tier"], "HIGH");
        assert_eq!(json["risks"]["word_of_mouth"], "HIGH");
    }
}
