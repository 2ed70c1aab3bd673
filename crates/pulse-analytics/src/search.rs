use pulse_types::FeedbackRecord;

/// Moderation search: case-insensitive substring match on the review text or
/// the author's display name. An empty or blank term matches everything.
pub fn search<'a, I>(records: I, term: &str) -> Vec<&'a FeedbackRecord>
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let needle = term.trim().to_lowercase();
    records
        .into_iter()
        .filter(|r| {
            needle.is_empty()
                || r.text.to_lowercase().contains(&needle)
                || r.user_name.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, review};

    #[test]
    fn matches_text_or_author() {
        let mut by_kim = review("1", "t1", 5, at(2024, 1, 1, 0));
        by_kim.user_name = "Kim Ji".into();
        let mut spam = review("2", "t1", 1, at(2024, 1, 1, 0));
        spam.text = "BUY cheap tickets".into();
        let records = vec![by_kim, spam];

        let hits: Vec<_> = search(&records, "kim").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec!["1"]);
        let hits: Vec<_> = search(&records, "Cheap").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec!["2"]);
        assert_eq!(search(&records, "  ").len(), 2);
        assert!(search(&records, "nothing like this").is_empty());
    }
}
