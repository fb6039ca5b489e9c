//! Domain primitives shared by the loader, the store and the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which parent table a title row lives in.
///
/// Join tables are split per parent (`movie_genres` / `show_genres`, ...),
/// so most link operations dispatch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Show,
}

impl TitleKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleKind {
    type Err = String;

    /// Accepts the dataset spelling (`MOVIE`/`SHOW`) as well as the lowercase form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "show" => Ok(Self::Show),
            other => Err(format!("unknown title type: {other}")),
        }
    }
}

/// Role of a person in a title's credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditRole {
    Actor,
    Director,
}

impl CreditRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Director => "director",
        }
    }
}

impl fmt::Display for CreditRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actor" => Ok(Self::Actor),
            "director" => Ok(Self::Director),
            other => Err(format!("unknown credit role: {other}")),
        }
    }
}

/// Lookup key for attribute rows: trimmed, internal whitespace collapsed, lowercased.
#[must_use]
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Source of the ratings imported from the titles file.
pub const IMDB_SOURCE: &str = "imdb";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_kind_parses_dataset_spelling() {
        assert_eq!("MOVIE".parse::<TitleKind>().unwrap(), TitleKind::Movie);
        assert_eq!(" show ".parse::<TitleKind>().unwrap(), TitleKind::Show);
        assert!("EPISODE".parse::<TitleKind>().is_err());
    }

    #[test]
    fn credit_role_round_trips_through_display() {
        for role in [CreditRole::Actor, CreditRole::Director] {
            assert_eq!(role.to_string().parse::<CreditRole>().unwrap(), role);
        }
        assert!("PRODUCER".parse::<CreditRole>().is_err());
    }

    #[test]
    fn normalize_key_collapses_whitespace_and_case() {
        assert_eq!(normalize_key("  Science   Fiction "), "science fiction");
        assert_eq!(normalize_key("DRAMA"), "drama");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn title_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TitleKind::Show).unwrap(),
            "\"show\""
        );
    }
}
