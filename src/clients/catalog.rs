//! HTTP client for the reelbase API.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::{MovieDto, PredictionDto, ShowDto};
use crate::config::ClientConfig;
use crate::domain::TitleKind;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// The `{success, data, error}` envelope every endpoint answers with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPrediction<'a> {
    pub user_id: &'a str,
    pub title_ref: Option<&'a str>,
    pub prediction_value: f64,
}

/// A movie or show as seen by API consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTitle {
    pub kind: TitleKind,
    pub source_id: String,
    pub title: String,
    pub release_year: i32,
    pub genres: Vec<String>,
    pub imdb_score: Option<f64>,
}

impl From<MovieDto> for CatalogTitle {
    fn from(m: MovieDto) -> Self {
        Self {
            kind: TitleKind::Movie,
            source_id: m.movie_id,
            title: m.title,
            release_year: m.release_year,
            genres: m.genres,
            imdb_score: m.imdb_score,
        }
    }
}

impl From<ShowDto> for CatalogTitle {
    fn from(s: ShowDto) -> Self {
        Self {
            kind: TitleKind::Show,
            source_id: s.show_id,
            title: s.title,
            release_year: s.release_year,
            genres: s.genres,
            imdb_score: s.imdb_score,
        }
    }
}

fn into_titles<T: Into<CatalogTitle>>(items: Vec<T>) -> Vec<CatalogTitle> {
    items.into_iter().map(Into::into).collect()
}

#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("reelbase/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/api/{}", self.base_url, path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Api { status, message });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope.data.ok_or_else(|| ClientError::Api {
            status,
            message: envelope
                .error
                .unwrap_or_else(|| "response carried no data".to_string()),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.url(path, query)?;
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    fn title_query(genre: Option<&str>, limit: u64) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(genre) = genre {
            query.push(("genre", genre.to_string()));
        }
        query
    }

    pub async fn list_movies(
        &self,
        genre: Option<&str>,
        limit: u64,
    ) -> Result<Vec<MovieDto>, ClientError> {
        self.get("movies", &Self::title_query(genre, limit)).await
    }

    pub async fn list_shows(
        &self,
        genre: Option<&str>,
        limit: u64,
    ) -> Result<Vec<ShowDto>, ClientError> {
        self.get("shows", &Self::title_query(genre, limit)).await
    }

    /// Movies and shows as one shape, optionally narrowed to a genre.
    pub async fn list_titles(
        &self,
        kind: TitleKind,
        genre: Option<&str>,
        limit: u64,
    ) -> Result<Vec<CatalogTitle>, ClientError> {
        Ok(match kind {
            TitleKind::Movie => into_titles(self.list_movies(genre, limit).await?),
            TitleKind::Show => into_titles(self.list_shows(genre, limit).await?),
        })
    }

    /// Highest IMDb scores first.
    pub async fn top_rated(
        &self,
        kind: TitleKind,
        genre: Option<&str>,
        limit: u64,
    ) -> Result<Vec<CatalogTitle>, ClientError> {
        let query = Self::title_query(genre, limit);
        Ok(match kind {
            TitleKind::Movie => {
                into_titles::<MovieDto>(self.get("movies/top-rated", &query).await?)
            }
            TitleKind::Show => into_titles::<ShowDto>(self.get("shows/top-rated", &query).await?),
        })
    }

    pub async fn submit_prediction(
        &self,
        prediction: &NewPrediction<'_>,
    ) -> Result<PredictionDto, ClientError> {
        let url = self.url("predictions", &[])?;
        let response = self.client.post(url).json(prediction).send().await?;
        Self::read(response).await
    }

    pub async fn list_predictions(
        &self,
        user_id: Option<&str>,
        limit: u64,
    ) -> Result<Vec<PredictionDto>, ClientError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id.to_string()));
        }
        self.get("predictions", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CatalogClient {
        CatalogClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn urls_are_built_under_api() {
        let url = client("http://localhost:8000/")
            .url("movies", &[("genre", "sci-fi & fantasy".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/movies?genre=sci-fi+%26+fantasy"
        );
    }

    #[test]
    fn envelope_without_data_decodes() {
        let envelope: Envelope<MovieDto> =
            serde_json::from_str(r#"{"success":false,"error":"Movie not found: tm9"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Movie not found: tm9"));

        let envelope: Envelope<Vec<ShowDto>> =
            serde_json::from_str(r#"{"success":true,"data":[]}"#).unwrap();
        assert_eq!(envelope.data.map(|d| d.len()), Some(0));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let result = client("not a url").url("movies", &[]);
        assert!(matches!(result, Err(ClientError::Url(_))));
    }
}
