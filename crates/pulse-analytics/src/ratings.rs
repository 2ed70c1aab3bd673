use pulse_types::FeedbackRecord;

/// Mean star rating rounded to one decimal; 0.0 for no feedback.
pub fn average_rating<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let (sum, count) = records
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| {
            (sum + u64::from(r.rating().get()), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    round1(sum as f64 / count as f64)
}

/// Number of reviews per star, index 0 holding one-star reviews.
pub fn rating_distribution<'a, I>(records: I) -> [usize; 5]
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let mut stars = [0usize; 5];
    for record in records {
        stars[usize::from(record.rating().get()) - 1] += 1;
    }
    stars
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
