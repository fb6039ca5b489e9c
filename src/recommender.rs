//! Demo consumer of the API: picks well-rated titles of a genre and can
//! record each pick as a prediction.

use async_trait::async_trait;
use std::cmp::Ordering;
use tracing::{info, warn};

use crate::clients::{CatalogClient, CatalogTitle, ClientError, NewPrediction};
use crate::domain::TitleKind;

/// Largest page the API serves.
const FETCH_LIMIT: u64 = 1000;

/// The part of the API the recommender needs.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn titles(
        &self,
        kind: TitleKind,
        genre: Option<&str>,
    ) -> Result<Vec<CatalogTitle>, ClientError>;

    async fn record_prediction(
        &self,
        user_id: &str,
        title_ref: &str,
        value: f64,
    ) -> Result<i32, ClientError>;
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn titles(
        &self,
        kind: TitleKind,
        genre: Option<&str>,
    ) -> Result<Vec<CatalogTitle>, ClientError> {
        self.list_titles(kind, genre, FETCH_LIMIT).await
    }

    async fn record_prediction(
        &self,
        user_id: &str,
        title_ref: &str,
        value: f64,
    ) -> Result<i32, ClientError> {
        let prediction = self
            .submit_prediction(&NewPrediction {
                user_id,
                title_ref: Some(title_ref),
                prediction_value: value,
            })
            .await?;
        Ok(prediction.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub genre: String,
    pub min_score: f64,
    pub count: usize,
}

/// A selected title together with the score that qualified it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub title: CatalogTitle,
    pub score: f64,
}

#[derive(Debug, Default)]
pub struct SubmitReport {
    pub submitted: Vec<i32>,
    pub failed: Vec<(String, ClientError)>,
}

/// Keeps titles of the rule's genre scoring at least `min_score`, best
/// first, at most `count` of them. Unrated titles never qualify.
#[must_use]
pub fn select(titles: Vec<CatalogTitle>, rule: &Rule) -> Vec<Pick> {
    let genre = rule.genre.trim().to_lowercase();

    let mut picks: Vec<Pick> = titles
        .into_iter()
        .filter(|t| t.genres.iter().any(|g| g.trim().to_lowercase() == genre))
        .filter_map(|title| {
            let score = title.imdb_score?;
            (score >= rule.min_score).then_some(Pick { title, score })
        })
        .collect();

    picks.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.title.source_id.cmp(&b.title.source_id))
    });
    picks.truncate(rule.count);
    picks
}

pub struct Recommender<C> {
    catalog: C,
    rule: Rule,
}

impl<C: Catalog> Recommender<C> {
    pub const fn new(catalog: C, rule: Rule) -> Self {
        Self { catalog, rule }
    }

    /// Fetches candidates of the given kinds and applies the rule across all of them.
    pub async fn recommend(&self, kinds: &[TitleKind]) -> Result<Vec<Pick>, ClientError> {
        let mut candidates = Vec::new();
        for kind in kinds {
            let titles = self.catalog.titles(*kind, Some(&self.rule.genre)).await?;
            info!(kind = %kind, count = titles.len(), "Fetched candidates");
            candidates.extend(titles);
        }
        Ok(select(candidates, &self.rule))
    }

    /// Posts one prediction per pick, valued at the pick's score. A failed
    /// submission is recorded and the rest still go out.
    pub async fn submit(&self, user_id: &str, picks: &[Pick]) -> SubmitReport {
        let mut report = SubmitReport::default();
        for pick in picks {
            let title_ref = pick.title.source_id.as_str();
            match self
                .catalog
                .record_prediction(user_id, title_ref, pick.score)
                .await
            {
                Ok(id) => report.submitted.push(id),
                Err(e) => {
                    warn!(title_ref, "Prediction not recorded: {}", e);
                    report.failed.push((title_ref.to_string(), e));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    fn title(id: &str, genres: &[&str], score: Option<f64>) -> CatalogTitle {
        CatalogTitle {
            kind: if id.starts_with("ts") {
                TitleKind::Show
            } else {
                TitleKind::Movie
            },
            source_id: id.to_string(),
            title: format!("Title {id}"),
            release_year: 2000,
            genres: genres.iter().map(|g| (*g).to_string()).collect(),
            imdb_score: score,
        }
    }

    fn rule(count: usize) -> Rule {
        Rule {
            genre: "Drama".to_string(),
            min_score: 7.0,
            count,
        }
    }

    #[test]
    fn select_filters_by_genre_and_score() {
        let picks = select(
            vec![
                title("tm1", &["drama"], Some(7.5)),
                title("tm2", &["comedy"], Some(9.0)),
                title("tm3", &["drama", "crime"], Some(6.9)),
                title("tm4", &["Drama"], None),
                title("tm5", &["DRAMA"], Some(7.0)),
            ],
            &rule(10),
        );

        let ids: Vec<_> = picks.iter().map(|p| p.title.source_id.as_str()).collect();
        assert_eq!(ids, vec!["tm1", "tm5"]);
    }

    #[test]
    fn select_sorts_best_first_and_truncates() {
        let picks = select(
            vec![
                title("tm1", &["drama"], Some(7.1)),
                title("tm2", &["drama"], Some(8.8)),
                title("ts1", &["drama"], Some(8.0)),
            ],
            &rule(2),
        );

        let ids: Vec<_> = picks.iter().map(|p| p.title.source_id.as_str()).collect();
        assert_eq!(ids, vec!["tm2", "ts1"]);
        assert!((picks[0].score - 8.8).abs() < f64::EPSILON);
    }

    #[derive(Default)]
    struct FakeCatalog {
        titles: Vec<CatalogTitle>,
        reject: Option<String>,
        submitted: Mutex<Vec<(String, String, f64)>>,
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn titles(
            &self,
            kind: TitleKind,
            _genre: Option<&str>,
        ) -> Result<Vec<CatalogTitle>, ClientError> {
            Ok(self
                .titles
                .iter()
                .filter(|t| t.kind == kind)
                .cloned()
                .collect())
        }

        async fn record_prediction(
            &self,
            user_id: &str,
            title_ref: &str,
            value: f64,
        ) -> Result<i32, ClientError> {
            if self.reject.as_deref() == Some(title_ref) {
                return Err(ClientError::Api {
                    status: StatusCode::BAD_REQUEST,
                    message: "rejected".to_string(),
                });
            }
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push((user_id.to_string(), title_ref.to_string(), value));
            Ok(i32::try_from(submitted.len()).unwrap())
        }
    }

    #[tokio::test]
    async fn recommend_merges_movies_and_shows() {
        let catalog = FakeCatalog {
            titles: vec![
                title("tm1", &["drama"], Some(7.5)),
                title("ts1", &["drama"], Some(9.1)),
            ],
            ..Default::default()
        };
        let recommender = Recommender::new(catalog, rule(5));

        let picks = recommender
            .recommend(&[TitleKind::Movie, TitleKind::Show])
            .await
            .unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].title.source_id, "ts1");

        let movies_only = recommender.recommend(&[TitleKind::Movie]).await.unwrap();
        assert_eq!(movies_only.len(), 1);
    }

    #[tokio::test]
    async fn submit_records_each_pick_and_keeps_going_on_failure() {
        let catalog = FakeCatalog {
            titles: vec![
                title("tm1", &["drama"], Some(7.5)),
                title("tm2", &["drama"], Some(8.5)),
                title("tm3", &["drama"], Some(9.5)),
            ],
            reject: Some("tm2".to_string()),
            ..Default::default()
        };
        let recommender = Recommender::new(catalog, rule(3));

        let picks = recommender.recommend(&[TitleKind::Movie]).await.unwrap();
        let report = recommender.submit("demo", &picks).await;

        assert_eq!(report.submitted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "tm2");

        let submitted = recommender.catalog.submitted.lock().unwrap();
        assert_eq!(submitted[0], ("demo".to_string(), "tm3".to_string(), 9.5));
    }
}
