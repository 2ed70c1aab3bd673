use crate::models::{CatalogEntry, Category, ReleaseType};

type Seed = (&'static str, &'static str, &'static str, Category, &'static str, ReleaseType, f32);

/// The 18 titles the platform ships with, six per regional category.
const SEED: &[Seed] = &[
    ("t1", "Vikram", "Action/Thriller", Category::Tamil, "Lokesh Kanagaraj", ReleaseType::Theatre, 4.8),
    ("t2", "Jailer", "Action/Drama", Category::Tamil, "Nelson Dilipkumar", ReleaseType::Theatre, 4.5),
    ("t3", "Leo", "Action/Crime", Category::Tamil, "Lokesh Kanagaraj", ReleaseType::Theatre, 4.2),
    ("t4", "Ponniyin Selvan 2", "Epic Drama", Category::Tamil, "Mani Ratnam", ReleaseType::Theatre, 4.7),
    ("t5", "Sirai", "Crime Thriller", Category::Tamil, "R. C. Sakthi", ReleaseType::Ott, 4.9),
    ("t6", "Joe", "Romantic Drama", Category::Tamil, "Hariharan Ram", ReleaseType::Theatre, 4.1),
    ("e1", "Oppenheimer", "Biographical Thriller", Category::English, "Christopher Nolan", ReleaseType::Theatre, 4.9),
    ("e2", "Dune: Part Two", "Sci-Fi Epic", Category::English, "Denis Villeneuve", ReleaseType::Theatre, 4.8),
    ("e3", "Barbie", "Fantasy Comedy", Category::English, "Greta Gerwig", ReleaseType::Theatre, 4.3),
    ("e4", "Spider-Man: Spider-Verse", "Animation/Action", Category::English, "Joaquim Dos Santos", ReleaseType::Theatre, 4.9),
    ("e5", "Guardians 3", "Sci-Fi/Action", Category::English, "James Gunn", ReleaseType::Theatre, 4.6),
    ("e6", "Puss in Boots: Last Wish", "Animation/Adventure", Category::English, "Joel Crawford", ReleaseType::Theatre, 4.7),
    ("k1", "Alchemy of Souls", "Fantasy/Romance", Category::KDrama, "Park Joon-hwa", ReleaseType::Ott, 4.9),
    ("k2", "The Glory", "Revenge Thriller", Category::KDrama, "Ahn Gil-ho", ReleaseType::Ott, 4.8),
    ("k3", "Lovely Runner", "Fantasy Romance", Category::KDrama, "Yoon Jong-ho", ReleaseType::Ott, 4.9),
    ("k4", "Squid Game", "Survival Thriller", Category::KDrama, "Hwang Dong-hyuk", ReleaseType::Ott, 4.4),
    ("k5", "Suzume", "Animation/Fantasy", Category::KDrama, "Makoto Shinkai", ReleaseType::Theatre, 4.8),
    ("k6", "Hidden Love", "Romance", Category::KDrama, "Gia Lee", ReleaseType::Ott, 4.9),
];

/// Immutable, ordered movie reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The built-in catalog.
    pub fn seeded() -> Self {
        let entries = SEED
            .iter()
            .map(|&(id, title, genre, category, director, release_type, base_rating)| CatalogEntry {
                id: id.to_string(),
                title: title.to_string(),
                genre: genre.to_string(),
                category,
                director: director.to_string(),
                release_type,
                base_rating,
            })
            .collect();
        Self { entries }
    }

    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
