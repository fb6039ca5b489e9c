use super::source::{CREDITS_ORIGIN, RawCredit, RawTitle, SourceRow, TITLES_ORIGIN};
use super::{RejectStage, RowError};
use crate::db::NewTitle;
use crate::domain::{CreditRole, TitleKind, normalize_key};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::warn;

pub const LIST_DELIMITER: &str = ",";
pub const CHARACTER_DELIMITER: &str = " / ";

fn list_literal_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\[\]'"]"#).expect("Invalid regex"))
}

/// Splits a denormalized multi-value cell such as `['drama', 'crime']`.
///
/// Brackets and quotes are stripped, values are trimmed, empties dropped and
/// repeats (compared case-insensitively) removed, keeping first spelling.
#[must_use]
pub fn split_values(raw: &str, delimiter: &str) -> Vec<String> {
    let cleaned = list_literal_chars().replace_all(raw, "");
    let mut seen = HashSet::new();

    cleaned
        .split(delimiter)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(normalize_key(v)))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    /// Local id, assigned 1, 2, ... in order of first sight
    pub id: usize,
    pub name: String,
    pub key: String,
    pub external_id: Option<String>,
}

/// Case-insensitive running lookup from attribute value to a stable local id.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    ids: HashMap<String, usize>,
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    pub fn intern(&mut self, name: &str) -> usize {
        self.intern_with(name, None)
    }

    /// The first external id seen for a key is kept.
    pub fn intern_with(&mut self, name: &str, external_id: Option<&str>) -> usize {
        let key = normalize_key(name);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }

        let id = self.entries.len() + 1;
        self.entries.push(LookupEntry {
            id,
            name: name.trim().to_string(),
            key: key.clone(),
            external_id: external_id.map(str::to_string),
        });
        self.ids.insert(key, id);
        id
    }

    #[must_use]
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTitle {
    pub kind: TitleKind,
    pub line: u64,
    pub title: NewTitle,
}

/// Link from a title (by source id) to a lookup-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleLink {
    pub kind: TitleKind,
    pub source_id: String,
    pub attribute: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreditLink {
    pub kind: TitleKind,
    pub source_id: String,
    pub person: usize,
    pub role: CreditRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterLink {
    pub kind: TitleKind,
    pub source_id: String,
    pub person: usize,
    pub character: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub kind: TitleKind,
    pub source_id: String,
    pub external_id: Option<String>,
    pub score: f64,
    pub votes: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedDataset {
    pub titles: Vec<NormalizedTitle>,
    pub genres: LookupTable,
    pub countries: LookupTable,
    pub people: LookupTable,
    pub characters: LookupTable,
    pub genre_links: Vec<TitleLink>,
    pub country_links: Vec<TitleLink>,
    pub credits: Vec<CreditLink>,
    pub character_links: Vec<CharacterLink>,
    pub ratings: Vec<RatingRow>,
    pub rejected: Vec<RowError>,
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Integers in the dataset are sometimes written as floats (`1.0`).
/// Floats outside the `i64` range count as missing.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_int(value: &str) -> Option<i64> {
    let value = non_empty(value)?;
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let f = value.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn parse_i32(value: &str) -> Option<i32> {
    parse_int(value).and_then(|n| i32::try_from(n).ok())
}

fn parse_score(value: &str) -> Option<f64> {
    non_empty(value)?
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}

/// Builds normalized entities and link rows from decoded source rows.
///
/// Malformed rows are excluded together with all of their links and
/// recorded in [`NormalizedDataset::rejected`].
#[must_use]
pub fn normalize(
    titles: &[SourceRow<RawTitle>],
    credits: &[SourceRow<RawCredit>],
) -> NormalizedDataset {
    let mut out = NormalizedDataset::default();
    let mut kinds: HashMap<String, TitleKind> = HashMap::new();

    for row in titles {
        match normalize_title(row, &kinds) {
            Ok(title) => {
                let kind = title.kind;
                let source_id = title.title.source_id.clone();
                let raw = &row.record;

                for genre in split_values(&raw.genres, LIST_DELIMITER) {
                    out.genre_links.push(TitleLink {
                        kind,
                        source_id: source_id.clone(),
                        attribute: out.genres.intern(&genre),
                    });
                }

                for country in split_values(&raw.production_countries, LIST_DELIMITER) {
                    out.country_links.push(TitleLink {
                        kind,
                        source_id: source_id.clone(),
                        attribute: out.countries.intern(&country),
                    });
                }

                if let Some(score) = parse_score(&raw.imdb_score) {
                    out.ratings.push(RatingRow {
                        kind,
                        source_id: source_id.clone(),
                        external_id: non_empty(&raw.imdb_id).map(str::to_string),
                        score,
                        votes: parse_int(&raw.imdb_votes),
                    });
                }

                kinds.insert(source_id, kind);
                out.titles.push(title);
            }
            Err(reason) => {
                out.rejected
                    .push(reject(TITLES_ORIGIN, row.line, &row.record.id, reason));
            }
        }
    }

    let mut seen_credits = HashSet::new();
    let mut seen_characters = HashSet::new();

    for row in credits {
        let (kind, role) = match check_credit(&row.record, &kinds) {
            Ok(found) => found,
            Err(reason) => {
                out.rejected
                    .push(reject(CREDITS_ORIGIN, row.line, &row.record.id, reason));
                continue;
            }
        };

        let raw = &row.record;
        let source_id = raw.id.trim().to_string();
        let person = out.people.intern_with(&raw.name, non_empty(&raw.person_id));

        let credit = CreditLink {
            kind,
            source_id: source_id.clone(),
            person,
            role,
        };
        if seen_credits.insert(credit.clone()) {
            out.credits.push(credit);
        }

        if role == CreditRole::Actor {
            for character in split_values(&raw.character, CHARACTER_DELIMITER) {
                let link = CharacterLink {
                    kind,
                    source_id: source_id.clone(),
                    person,
                    character: out.characters.intern(&character),
                };
                if seen_characters.insert(link.clone()) {
                    out.character_links.push(link);
                }
            }
        }
    }

    if !out.rejected.is_empty() {
        warn!(
            "Normalization rejected {} of {} rows",
            out.rejected.len(),
            titles.len() + credits.len()
        );
    }

    out
}

fn normalize_title(
    row: &SourceRow<RawTitle>,
    seen: &HashMap<String, TitleKind>,
) -> Result<NormalizedTitle, String> {
    let raw = &row.record;

    let source_id = non_empty(&raw.id).ok_or("missing id")?;
    let title = non_empty(&raw.title).ok_or("missing title")?;
    let kind = non_empty(&raw.kind)
        .ok_or_else(|| "missing type".to_string())?
        .parse::<TitleKind>()?;
    let year_text = non_empty(&raw.release_year).ok_or("missing release_year")?;
    let release_year =
        parse_i32(year_text).ok_or_else(|| format!("release_year is not a number: {year_text}"))?;

    if seen.contains_key(source_id) {
        return Err(format!("duplicate title id {source_id}"));
    }

    Ok(NormalizedTitle {
        kind,
        line: row.line,
        title: NewTitle {
            source_id: source_id.to_string(),
            title: title.to_string(),
            release_year,
            age_certification: non_empty(&raw.age_certification).map(str::to_string),
            runtime: parse_i32(&raw.runtime).unwrap_or(0),
            seasons: match kind {
                TitleKind::Show => parse_i32(&raw.seasons),
                TitleKind::Movie => None,
            },
            description: non_empty(&raw.description).map(str::to_string),
        },
    })
}

fn check_credit(
    raw: &RawCredit,
    kinds: &HashMap<String, TitleKind>,
) -> Result<(TitleKind, CreditRole), String> {
    let title_id = non_empty(&raw.id).ok_or("missing id")?;
    non_empty(&raw.name).ok_or("missing name")?;
    let role = non_empty(&raw.role)
        .ok_or_else(|| "missing role".to_string())?
        .parse::<CreditRole>()?;
    let kind = kinds
        .get(title_id)
        .copied()
        .ok_or_else(|| format!("unknown title {title_id}"))?;

    Ok((kind, role))
}

fn reject(origin: &str, line: u64, key: &str, reason: impl Into<String>) -> RowError {
    let reason = reason.into();
    warn!(origin, line, key, "Rejected row: {}", reason);
    RowError::new(
        RejectStage::Normalize,
        origin,
        Some(line),
        non_empty(key).map(str::to_string),
        reason,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: &str, kind: &str, year: &str, genres: &str) -> SourceRow<RawTitle> {
        SourceRow {
            line: 2,
            record: RawTitle {
                id: id.to_string(),
                title: format!("Title {id}"),
                kind: kind.to_string(),
                release_year: year.to_string(),
                genres: genres.to_string(),
                ..Default::default()
            },
        }
    }

    fn credit(id: &str, name: &str, character: &str, role: &str) -> SourceRow<RawCredit> {
        SourceRow {
            line: 2,
            record: RawCredit {
                person_id: "1".to_string(),
                id: id.to_string(),
                name: name.to_string(),
                character: character.to_string(),
                role: role.to_string(),
            },
        }
    }

    #[test]
    fn split_values_strips_list_literal() {
        assert_eq!(
            split_values("['drama', 'crime']", LIST_DELIMITER),
            vec!["drama", "crime"]
        );
        assert!(split_values("[]", LIST_DELIMITER).is_empty());
        assert!(split_values("", LIST_DELIMITER).is_empty());
    }

    #[test]
    fn split_values_drops_empties_and_case_duplicates() {
        assert_eq!(
            split_values("['Drama', '', ' drama ', 'comedy']", LIST_DELIMITER),
            vec!["Drama", "comedy"]
        );
    }

    #[test]
    fn split_values_on_character_delimiter() {
        assert_eq!(
            split_values("Batman / Bruce Wayne", CHARACTER_DELIMITER),
            vec!["Batman", "Bruce Wayne"]
        );
    }

    #[test]
    fn lookup_table_assigns_ids_in_order_of_first_sight() {
        let mut table = LookupTable::default();
        assert_eq!(table.intern("Drama"), 1);
        assert_eq!(table.intern("comedy"), 2);
        assert_eq!(table.intern("  DRAMA "), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].name, "Drama");
    }

    #[test]
    fn genre_links_match_distinct_values() {
        let titles = vec![
            title("tm1", "MOVIE", "2001", "['drama', 'crime', 'Drama', '']"),
            title("ts1", "SHOW", "2005", "['crime']"),
        ];
        let out = normalize(&titles, &[]);

        let tm1_links = out
            .genre_links
            .iter()
            .filter(|l| l.source_id == "tm1")
            .count();
        assert_eq!(tm1_links, 2);
        assert_eq!(out.genre_links.len(), 3);
        assert_eq!(out.genres.len(), 2);
        assert_eq!(out.titles[1].kind, TitleKind::Show);
    }

    #[test]
    fn empty_genre_list_emits_no_links() {
        let out = normalize(&[title("tm1", "MOVIE", "2001", "[]")], &[]);
        assert_eq!(out.titles.len(), 1);
        assert!(out.genre_links.is_empty());
    }

    #[test]
    fn malformed_titles_are_rejected_with_their_links() {
        let titles = vec![
            title("", "MOVIE", "2001", "['drama']"),
            title("tm2", "EPISODE", "2001", "['drama']"),
            title("tm3", "MOVIE", "soon", "['drama']"),
            title("tm4", "MOVIE", "", "['drama']"),
        ];
        let out = normalize(&titles, &[]);

        assert!(out.titles.is_empty());
        assert!(out.genre_links.is_empty());
        assert_eq!(out.rejected.len(), 4);
        assert!(out.rejected[2].reason.contains("release_year"));
        assert_eq!(out.rejected[1].key.as_deref(), Some("tm2"));
    }

    #[test]
    fn duplicate_title_id_keeps_first() {
        let mut second = title("tm1", "MOVIE", "1999", "['comedy']");
        second.line = 3;
        let out = normalize(&[title("tm1", "MOVIE", "2001", "['drama']"), second], &[]);

        assert_eq!(out.titles.len(), 1);
        assert_eq!(out.titles[0].title.release_year, 2001);
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].line, Some(3));
    }

    #[test]
    fn optional_numbers_fall_back_to_missing() {
        let mut row = title("ts1", "SHOW", "2019.0", "");
        row.record.runtime = "n/a".to_string();
        row.record.seasons = "2.0".to_string();
        row.record.imdb_score = "high".to_string();

        let out = normalize(&[row], &[]);
        let show = &out.titles[0].title;

        assert_eq!(show.release_year, 2019);
        assert_eq!(show.runtime, 0);
        assert_eq!(show.seasons, Some(2));
        assert!(out.ratings.is_empty());
    }

    #[test]
    fn out_of_range_floats_are_missing() {
        let mut row = title("tm1", "MOVIE", "2001", "");
        row.record.imdb_score = "7.1".to_string();
        row.record.imdb_votes = "1e30".to_string();
        row.record.runtime = "-1e300".to_string();

        let out = normalize(&[row], &[]);

        assert_eq!(out.titles[0].title.runtime, 0);
        assert_eq!(out.ratings[0].votes, None);
        assert_eq!(parse_int("9.3e18"), None);
        assert_eq!(parse_int("4e3"), Some(4000));
    }

    #[test]
    fn imdb_columns_become_one_rating() {
        let mut row = title("tm1", "MOVIE", "1976", "");
        row.record.imdb_id = "tt0075314".to_string();
        row.record.imdb_score = "8.2".to_string();
        row.record.imdb_votes = "808582.0".to_string();

        let out = normalize(&[row], &[]);

        assert_eq!(
            out.ratings,
            vec![RatingRow {
                kind: TitleKind::Movie,
                source_id: "tm1".to_string(),
                external_id: Some("tt0075314".to_string()),
                score: 8.2,
                votes: Some(808_582),
            }]
        );
    }

    #[test]
    fn credits_share_people_and_split_characters() {
        let titles = vec![
            title("tm1", "MOVIE", "2001", ""),
            title("tm2", "MOVIE", "2002", ""),
        ];
        let credits = vec![
            credit("tm1", "Jane Doe", "Alice / The Queen", "ACTOR"),
            credit("tm2", "jane  doe", "", "ACTOR"),
            credit("tm1", "John Roe", "Ignored", "DIRECTOR"),
            credit("tm1", "Jane Doe", "Alice", "ACTOR"),
        ];
        let out = normalize(&titles, &credits);

        assert_eq!(out.people.len(), 2);
        assert_eq!(out.credits.len(), 3);
        assert_eq!(out.characters.len(), 2);
        assert_eq!(out.character_links.len(), 2);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn bad_credits_are_rejected() {
        let titles = vec![title("tm1", "MOVIE", "2001", "")];
        let credits = vec![
            credit("tm9", "Nobody", "", "ACTOR"),
            credit("tm1", "", "", "ACTOR"),
            credit("tm1", "Someone", "", "PRODUCER"),
            credit("tm1", "Someone", "", ""),
        ];
        let out = normalize(&titles, &credits);

        assert!(out.credits.is_empty());
        assert!(out.people.is_empty());
        assert_eq!(out.rejected.len(), 4);
        assert!(out.rejected[0].reason.contains("unknown title"));
    }
}
