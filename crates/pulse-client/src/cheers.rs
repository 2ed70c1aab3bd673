use rand::seq::IndexedRandom;

/// Shown after a review is posted.
pub const CHEERS: &[&str] = &[
    "You've got great taste!",
    "Cinema is better with fans like you!",
    "Sending a pulse of love your way!",
    "The director just thanked you personally!",
    "A standing ovation for your feedback!",
    "Your review is the blockbuster of today!",
    "We're 'rolling' in love with your comment!",
    "Oscar-worthy feedback right here!",
    "You're the hero of this application!",
    "Spreading cinematic joy everywhere!",
];

pub fn random_cheer() -> &'static str {
    CHEERS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("Thanks for your feedback!")
}
