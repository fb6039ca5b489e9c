//! CSV readers for the titles and credits files.
//!
//! Every column is read as text; numeric parsing and required-field checks
//! happen in [`super::normalize`] so one bad cell rejects one row instead of
//! the whole file.

use super::{EtlError, RejectStage, RowError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;

pub const TITLES_ORIGIN: &str = "titles";
pub const CREDITS_ORIGIN: &str = "credits";

/// One row of the titles file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawTitle {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub release_year: String,
    pub age_certification: String,
    pub runtime: String,
    pub genres: String,
    pub production_countries: String,
    pub seasons: String,
    pub imdb_id: String,
    pub imdb_score: String,
    pub imdb_votes: String,
}

/// One row of the credits file. `id` is the title the credit belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawCredit {
    pub person_id: String,
    pub id: String,
    pub name: String,
    pub character: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow<T> {
    /// 1-based line in the source file
    pub line: u64,
    pub record: T,
}

#[derive(Debug, Clone)]
pub struct SourceBatch<T> {
    pub rows: Vec<SourceRow<T>>,
    pub errors: Vec<RowError>,
}

impl<T> Default for SourceBatch<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            errors: Vec::new(),
        }
    }
}

pub fn read_titles(path: &Path) -> Result<SourceBatch<RawTitle>, EtlError> {
    read_path(path, TITLES_ORIGIN)
}

pub fn read_credits(path: &Path) -> Result<SourceBatch<RawCredit>, EtlError> {
    read_path(path, CREDITS_ORIGIN)
}

fn read_path<T: DeserializeOwned>(path: &Path, origin: &str) -> Result<SourceBatch<T>, EtlError> {
    let file = std::fs::File::open(path).map_err(|source| EtlError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_from(file, origin)
}

/// Reads CSV rows by header name. Unknown columns are ignored and missing
/// ones default to empty.
pub fn read_from<R, T>(reader: R, origin: &str) -> Result<SourceBatch<T>, EtlError>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|source| EtlError::Header {
            origin: origin.to_string(),
            source,
        })?
        .clone();

    let mut batch = SourceBatch::default();
    let mut record = csv::StringRecord::new();

    loop {
        match csv.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map_or(0, csv::Position::line);
                match record.deserialize::<T>(Some(&headers)) {
                    Ok(parsed) => batch.rows.push(SourceRow {
                        line,
                        record: parsed,
                    }),
                    Err(e) => batch.errors.push(RowError::new(
                        RejectStage::Decode,
                        origin,
                        Some(line),
                        None,
                        e.to_string(),
                    )),
                }
            }
            Err(e) if e.is_io_error() => {
                return Err(EtlError::Read {
                    origin: origin.to_string(),
                    source: e,
                });
            }
            Err(e) => {
                let line = e.position().map(csv::Position::line);
                batch.errors.push(RowError::new(
                    RejectStage::Decode,
                    origin,
                    line,
                    None,
                    e.to_string(),
                ));
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLES: &str = "\
index,id,title,type,description,release_year,age_certification,runtime,genres,production_countries,seasons,imdb_id,imdb_score,imdb_votes
0,ts300399,Five Came Back,SHOW,A doc,1945,TV-MA,48,['documentation'],['US'],1.0,,,
1,tm84618,Taxi Driver,MOVIE,,1976,R,113,\"['drama', 'crime']\",['US'],,tt0075314,8.2,808582.0
";

    #[test]
    fn reads_titles_by_header_name() {
        let batch: SourceBatch<RawTitle> = read_from(TITLES.as_bytes(), TITLES_ORIGIN).unwrap();

        assert!(batch.errors.is_empty());
        assert_eq!(batch.rows.len(), 2);

        let taxi = &batch.rows[1];
        assert_eq!(taxi.line, 3);
        assert_eq!(taxi.record.id, "tm84618");
        assert_eq!(taxi.record.kind, "MOVIE");
        assert_eq!(taxi.record.genres, "['drama', 'crime']");
        assert_eq!(taxi.record.imdb_score, "8.2");
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let csv = "id,title,type,release_year\ntm1,Short,MOVIE,2001\n";
        let batch: SourceBatch<RawTitle> = read_from(csv.as_bytes(), TITLES_ORIGIN).unwrap();

        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].record.runtime, "");
        assert_eq!(batch.rows[0].record.genres, "");
    }

    #[test]
    fn reads_credits_ignoring_index_column() {
        let csv = "index,person_id,id,name,character,role\n0,3748,tm84618,Robert De Niro,Travis Bickle,ACTOR\n";
        let batch: SourceBatch<RawCredit> = read_from(csv.as_bytes(), CREDITS_ORIGIN).unwrap();

        assert_eq!(batch.rows.len(), 1);
        let credit = &batch.rows[0].record;
        assert_eq!(credit.person_id, "3748");
        assert_eq!(credit.id, "tm84618");
        assert_eq!(credit.role, "ACTOR");
    }

    #[test]
    fn invalid_utf8_row_is_reported_and_skipped() {
        let mut bytes = b"id,title,type,release_year\n".to_vec();
        bytes.extend_from_slice(b"tm1,\xff\xfe,MOVIE,2001\n");
        bytes.extend_from_slice(b"tm2,Fine,MOVIE,2002\n");

        let batch: SourceBatch<RawTitle> = read_from(bytes.as_slice(), TITLES_ORIGIN).unwrap();

        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].record.id, "tm2");
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].stage, RejectStage::Decode);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = read_titles(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, EtlError::Open { .. }));
    }
}
