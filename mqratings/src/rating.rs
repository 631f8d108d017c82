//! Rating values and `"SYSTEM:NAME"` parsing

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::system::{system, systems};
use crate::{Error, Result};

/// A concrete certification rating, bound to its system.
///
/// `value` is the severity ordinal inside the system (0 = mildest). The
/// unrated placeholder `MPAA:NR` sits at ordinal 0, below `G`, so banded
/// selections that start at `G` naturally exclude unrated content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rating {
    pub system: String,
    pub name: String,
    pub value: u32,
}

impl Rating {
    /// Parses `"SYSTEM:NAME"`, or a bare `"NAME"` searched across all
    /// registered systems in registration order.
    ///
    /// # Arguments
    /// * `text` - e.g. `"MPAA:PG-13"`, `"bbfc:12a"`, `"PG-13"`
    ///
    /// # Returns
    /// The resolved rating, or [`Error::UnknownSystem`] /
    /// [`Error::UnknownRating`] when nothing matches.
    pub fn parse(text: &str) -> Result<Rating> {
        let text = text.trim();
        match text.split_once(':') {
            Some((sys, name)) => {
                let sys = system(sys.trim()).ok_or_else(|| Error::UnknownSystem(sys.into()))?;
                sys.rating(name.trim())
                    .ok_or_else(|| Error::UnknownRating(text.into()))
            }
            None => systems()
                .iter()
                .find_map(|s| s.rating(text))
                .ok_or_else(|| Error::UnknownRating(text.into())),
        }
    }

    /// The unrated placeholder used for features without certification data
    pub fn nr() -> Rating {
        Rating {
            system: "MPAA".into(),
            name: "NR".into(),
            value: 0,
        }
    }

    /// Ordinal severity comparison.
    ///
    /// Comparison across systems is by raw ordinal; callers decide when that
    /// comparison is meaningful.
    pub fn cmp_severity(&self, other: &Rating) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.system, self.name)
    }
}

impl FromStr for Rating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rating::parse(s)
    }
}

impl Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Rating::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_system_and_name() {
        let r = Rating::parse("MPAA:PG-13").unwrap();
        assert_eq!(r.system, "MPAA");
        assert_eq!(r.name, "PG-13");
        assert_eq!(r.value, 3);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_canonicalizes() {
        let r = Rating::parse("bbfc:12a").unwrap();
        assert_eq!(r.system, "BBFC");
        assert_eq!(r.name, "12A");
    }

    #[test]
    fn test_parse_bare_name_searches_registration_order() {
        // "PG" existe dans MPAA et BBFC ; MPAA est enregistré en premier
        let r = Rating::parse("PG").unwrap();
        assert_eq!(r.system, "MPAA");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Rating::parse("NOPE:PG"),
            Err(Error::UnknownSystem(_))
        ));
        assert!(matches!(
            Rating::parse("MPAA:XYZ"),
            Err(Error::UnknownRating(_))
        ));
        assert!(matches!(Rating::parse("XYZ"), Err(Error::UnknownRating(_))));
    }

    #[test]
    fn test_display_round_trips() {
        let r = Rating::parse("FSK:16").unwrap();
        assert_eq!(Rating::parse(&r.to_string()).unwrap(), r);
    }

    #[test]
    fn test_severity_ordering() {
        let g = Rating::parse("MPAA:G").unwrap();
        let r = Rating::parse("MPAA:R").unwrap();
        assert_eq!(g.cmp_severity(&r), Ordering::Less);
        assert_eq!(r.cmp_severity(&g), Ordering::Greater);
        assert_eq!(g.cmp_severity(&g), Ordering::Equal);
    }

    #[test]
    fn test_nr_sits_below_g() {
        let nr = Rating::nr();
        let g = Rating::parse("MPAA:G").unwrap();
        assert!(nr.cmp_severity(&g).is_lt());
    }

    #[test]
    fn test_serde_as_string() {
        let r = Rating::parse("MPAA:R").unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"MPAA:R\"");
        let back: Rating = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
