use pulse_types::{FeedbackRecord, Sentiment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassShare {
    pub count: usize,
    /// `round(100 * count / total)`; 0 when there is no feedback.
    pub percent: u32,
}

/// Positive/neutral/negative split of a feedback set.
///
/// The empty set maps to all-zero counts and percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub total: usize,
    pub positive: ClassShare,
    pub neutral: ClassShare,
    pub negative: ClassShare,
}

impl SentimentBreakdown {
    pub fn share(&self, sentiment: Sentiment) -> ClassShare {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// Within ±3 of 100 for any non-empty input because of per-class rounding.
    pub fn percent_sum(&self) -> u32 {
        self.positive.percent + self.neutral.percent + self.negative.percent
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

pub fn sentiment_breakdown<'a, I>(records: I) -> SentimentBreakdown
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let (mut pos, mut neu, mut neg) = (0usize, 0usize, 0usize);
    for record in records {
        match record.sentiment() {
            Sentiment::Positive => pos += 1,
            Sentiment::Neutral => neu += 1,
            Sentiment::Negative => neg += 1,
        }
    }

    let total = pos + neu + neg;
    let share = |count: usize| ClassShare {
        count,
        percent: percent_of(count, total),
    };

    SentimentBreakdown {
        total,
        positive: share(pos),
        neutral: share(neu),
        negative: share(neg),
    }
}

pub(crate) fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}
