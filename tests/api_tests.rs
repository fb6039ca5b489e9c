use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use reelbase::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();

    let state = reelbase::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    reelbase::api::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn heat() -> Value {
    json!({
        "movie_id": "tm1",
        "title": "Heat",
        "release_year": 1995,
        "runtime": 170,
        "age_certification": "R",
        "description": "Cops and robbers.",
        "genres": ["Drama", "crime"]
    })
}

#[tokio::test]
async fn created_movie_reads_back() {
    let app = spawn_app().await;

    let (status, created) = send(&app, "POST", "/api/movies", Some(heat())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);

    let (status, body) = send(&app, "GET", "/api/movies/tm1", None).await;
    assert_eq!(status, StatusCode::OK);

    let movie = &body["data"];
    assert_eq!(movie["movie_id"], "tm1");
    assert_eq!(movie["title"], "Heat");
    assert_eq!(movie["release_year"], 1995);
    assert_eq!(movie["runtime"], 170);
    assert_eq!(movie["age_certification"], "R");
    assert_eq!(movie["description"], "Cops and robbers.");
    assert_eq!(movie["id"], created["data"]["id"]);

    let mut genres: Vec<String> = movie["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_str().unwrap().to_string())
        .collect();
    genres.sort();
    assert_eq!(genres, vec!["Drama", "crime"]);
}

#[tokio::test]
async fn genre_filter_returns_only_linked_titles() {
    let app = spawn_app().await;

    send(&app, "POST", "/api/movies", Some(heat())).await;
    send(
        &app,
        "POST",
        "/api/movies",
        Some(json!({
            "movie_id": "tm2",
            "title": "Airplane!",
            "release_year": 1980,
            "runtime": 88,
            "genres": ["comedy"]
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/movies?genre=DRAMA", None).await;
    assert_eq!(status, StatusCode::OK);
    let movies = body["data"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["movie_id"], "tm1");

    let (_, body) = send(&app, "GET", "/api/movies?title=plane", None).await;
    assert_eq!(body["data"][0]["movie_id"], "tm2");

    let (_, body) = send(&app, "GET", "/api/movies?limit=1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_writes_are_client_errors() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/movies",
        Some(json!({ "movie_id": "tm1", "release_year": 1995, "runtime": 170 })),
    )
    .await;
    assert!(status.is_client_error());

    let mut early = heat();
    early["release_year"] = json!(1700);
    let (status, body) = send(&app, "POST", "/api/movies", Some(early)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let mut blank = heat();
    blank["genres"] = json!(["  "]);
    let (status, _) = send(&app, "POST", "/api/movies", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/movies?title=ab", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/movies?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/movies/tm404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/api/shows/ts404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/genres/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/movies/tm404",
        Some(json!({ "title": "Nothing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicates_are_conflicts() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "POST", "/api/movies", Some(heat())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/api/movies", Some(heat())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/api/genres", Some(json!({ "name": "Western" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/genres",
        Some(json!({ "name": "  western " })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/ratings",
        Some(json!({ "movie_id": 999, "source": "imdb", "score": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_replaces_fields_and_genres() {
    let app = spawn_app().await;
    send(&app, "POST", "/api/movies", Some(heat())).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/movies/tm1",
        Some(json!({ "runtime": 171, "genres": ["thriller"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["runtime"], 171);
    assert_eq!(body["data"]["title"], "Heat");
    assert_eq!(body["data"]["genres"], json!(["thriller"]));

    let (_, body) = send(&app, "GET", "/api/movies?genre=drama", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn shows_carry_seasons() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/shows",
        Some(json!({
            "show_id": "ts1",
            "title": "Dark",
            "release_year": 2017,
            "runtime": 60,
            "seasons": 3,
            "age_certification": "TV-MA",
            "genres": ["scifi"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["seasons"], 3);

    let (status, body) = send(
        &app,
        "GET",
        "/api/shows/by-details?age_certification=TV-MA&release_year=2017",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["show_id"], "ts1");

    let (status, _) = send(&app, "GET", "/api/shows/by-details", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn top_rated_uses_imdb_ratings() {
    let app = spawn_app().await;

    let mut ids = Vec::new();
    for (movie_id, title, score) in [("tm1", "Heat", 8.3), ("tm2", "Ronin", 7.2)] {
        let (_, body) = send(
            &app,
            "POST",
            "/api/movies",
            Some(json!({
                "movie_id": movie_id,
                "title": title,
                "release_year": 1995,
                "runtime": 120,
                "genres": ["crime"]
            })),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();
        ids.push(id);

        let (status, _) = send(
            &app,
            "POST",
            "/api/ratings",
            Some(json!({ "movie_id": id, "source": "IMDB", "score": score, "votes": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/movies/top-rated", None).await;
    assert_eq!(status, StatusCode::OK);
    let top = body["data"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["movie_id"], "tm1");
    assert_eq!(top[0]["imdb_score"], 8.3);

    let (_, body) = send(&app, "GET", "/api/ratings?min_score=8", None).await;
    let ratings = body["data"].as_array().unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["movie_id"], ids[0]);
    assert_eq!(ratings[0]["source"], "imdb");

    let (status, _) = send(
        &app,
        "POST",
        "/api/ratings",
        Some(json!({ "movie_id": ids[0], "show_id": 1, "source": "imdb", "score": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn people_can_be_created_and_renamed() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/people",
        Some(json!({ "name": "Al Pacino", "external_id": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/people/{id}"),
        Some(json!({ "name": "Alfredo Pacino" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Alfredo Pacino");
    assert_eq!(body["data"]["external_id"], "1");

    let (_, body) = send(&app, "GET", "/api/people?name=alfredo", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn predictions_are_recorded_per_user() {
    let app = spawn_app().await;

    for (user, value) in [("alice", 8.1), ("bob", 6.0), ("alice", 7.4)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/predictions",
            Some(json!({ "user_id": user, "title_ref": "tm1", "prediction_value": value })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/predictions?user_id=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let predictions = body["data"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["prediction_value"], 7.4);

    let (status, _) = send(
        &app,
        "POST",
        "/api/predictions",
        Some(json!({ "user_id": " ", "prediction_value": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn media_search_spans_movies_and_shows() {
    let app = spawn_app().await;
    send(&app, "POST", "/api/movies", Some(heat())).await;
    send(
        &app,
        "POST",
        "/api/shows",
        Some(json!({
            "show_id": "ts1",
            "title": "Dark Heat",
            "release_year": 2017,
            "runtime": 60,
            "genres": ["drama"]
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/media?title=heat&genre=drama", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["media_type"], "movie");
    assert_eq!(rows[1]["media_type"], "show");

    let (_, body) = send(&app, "GET", "/api/media?media_type=SHOW", None).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["media_type"] == "show")
    );

    let (status, _) = send(&app, "GET", "/api/media?media_type=book", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_endpoints_report_health() {
    let app = spawn_app().await;
    send(&app, "POST", "/api/movies", Some(heat())).await;

    let (status, body) = send(&app, "GET", "/api/system/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tables"]["movies"], 1);
    assert_eq!(body["data"]["tables"]["genres"], 2);

    let (status, body) = send(&app, "GET", "/api/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");

    let (status, body) = send(&app, "GET", "/api/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);

    let (status, _) = send(&app, "GET", "/api/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
