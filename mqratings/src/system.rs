//! Static registry of certification systems

use once_cell::sync::Lazy;

use crate::Rating;

/// A certification system, with its ratings ordered from mildest to most
/// severe. The position of a rating in `ratings` is its severity ordinal.
#[derive(Debug, Clone)]
pub struct RatingSystem {
    /// Short identifier used in `"SYSTEM:NAME"` strings ("MPAA", "BBFC", ...)
    pub id: &'static str,
    /// Human readable name of the certification body
    pub name: &'static str,
    /// Ratings from mildest to most severe
    pub ratings: &'static [&'static str],
}

impl RatingSystem {
    /// Severity ordinal of `name` inside this system (case-insensitive)
    pub fn ordinal(&self, name: &str) -> Option<u32> {
        self.ratings
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name))
            .map(|p| p as u32)
    }

    /// Builds a [`Rating`] for `name` if this system defines it
    pub fn rating(&self, name: &str) -> Option<Rating> {
        let pos = self
            .ratings
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name))?;
        Some(Rating {
            system: self.id.to_string(),
            name: self.ratings[pos].to_string(),
            value: pos as u32,
        })
    }
}

// L'ordre d'enregistrement compte : un nom nu ("PG") est résolu en parcourant
// les systèmes dans cet ordre.
static SYSTEMS: Lazy<Vec<RatingSystem>> = Lazy::new(|| {
    vec![
        RatingSystem {
            id: "MPAA",
            name: "Motion Picture Association",
            ratings: &["NR", "G", "PG", "PG-13", "R", "NC-17"],
        },
        RatingSystem {
            id: "BBFC",
            name: "British Board of Film Classification",
            ratings: &["U", "PG", "12A", "12", "15", "18", "R18"],
        },
        RatingSystem {
            id: "FSK",
            name: "Freiwillige Selbstkontrolle der Filmwirtschaft",
            ratings: &["0", "6", "12", "16", "18"],
        },
    ]
});

/// All registered certification systems, in registration order
pub fn systems() -> &'static [RatingSystem] {
    &SYSTEMS
}

/// Looks up a system by identifier (case-insensitive)
pub fn system(id: &str) -> Option<&'static RatingSystem> {
    SYSTEMS.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}
