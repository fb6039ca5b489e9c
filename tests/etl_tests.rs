use reelbase::db::{MediaFilter, Store, TitleFilter};
use reelbase::etl::{self, RejectStage};
use sea_orm::ConnectionTrait;
use std::path::PathBuf;

const TITLES: &str = "\
index,id,title,type,description,release_year,age_certification,runtime,genres,production_countries,seasons,imdb_id,imdb_score,imdb_votes
0,tm1,Heat,MOVIE,Cops and robbers.,1995,R,170,\"['drama', 'crime', 'Drama']\",['US'],,tt0113277,8.3,700000
1,ts1,Dark,SHOW,Time travel.,2017,TV-MA,60,\"['scifi', 'drama']\",\"['DE']\",3,tt5753856,8.7,400000
2,tm2,,MOVIE,No title here.,2001,,90,['comedy'],,,,,
3,tm3,Amelie,MOVIE,,2001,R,122,['comedy'],\"['FR']\",,tt0211915,8.3,
4,tm4,Broken Year,MOVIE,,soon,,90,[],[],,,,
";

const CREDITS: &str = "\
index,person_id,id,name,character,role
0,11,tm1,Al Pacino,Vincent Hanna,ACTOR
1,12,tm1,Robert De Niro,Neil McCauley,ACTOR
2,13,tm1,Michael Mann,,DIRECTOR
3,14,ts1,Louis Hofmann,Jonas Kahnwald / Jonas,ACTOR
4,11,tm3,Al Pacino,Himself,ACTOR
5,15,tm99,Nobody,Ghost,ACTOR
6,16,tm3,Someone,Extra,PRODUCER
";

struct Fixture {
    titles: PathBuf,
    credits: PathBuf,
    reject_log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("reelbase-etl-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let titles = dir.join("titles.csv");
        let credits = dir.join("credits.csv");
        std::fs::write(&titles, TITLES).unwrap();
        std::fs::write(&credits, CREDITS).unwrap();

        Self {
            titles,
            credits,
            reject_log: dir.join("rejected.jsonl"),
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        if let Some(dir) = self.titles.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }
}

async fn store() -> Store {
    Store::new("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn load_normalizes_titles_and_attributes() {
    let fixture = Fixture::new();
    let store = store().await;

    let report = etl::run(&store, &fixture.titles, &fixture.credits, None)
        .await
        .unwrap();

    assert_eq!(report.table("movies").inserted, 2);
    assert_eq!(report.table("shows").inserted, 1);
    // drama, crime, scifi, comedy; the repeated 'Drama' shares a row
    assert_eq!(report.table("genres").inserted, 4);
    assert_eq!(report.table("movie_genres").inserted, 3);
    assert_eq!(report.table("show_genres").inserted, 2);
    assert_eq!(report.table("people").inserted, 4);
    assert_eq!(report.table("characters").inserted, 5);
    assert_eq!(report.table("ratings").inserted, 3);

    let counts = store.table_counts().await.unwrap();
    assert_eq!(counts.movies, 2);
    assert_eq!(counts.shows, 1);
    assert_eq!(counts.genres, 4);
    assert_eq!(counts.countries, 3);
    assert_eq!(counts.people, 4);

    let heat = store.movies().get("tm1").await.unwrap();
    assert_eq!(heat.title, "Heat");
    assert_eq!(heat.runtime, 170);
    assert_eq!(heat.imdb_score, Some(8.3));
    assert_eq!(heat.imdb_votes, Some(700_000));
    let mut genres = heat.genres.clone();
    genres.sort();
    assert_eq!(genres, vec!["crime".to_string(), "drama".to_string()]);

    let dark = store.shows().get("ts1").await.unwrap();
    assert_eq!(dark.seasons, Some(3));
}

#[tokio::test]
async fn second_load_creates_no_duplicates() {
    let fixture = Fixture::new();
    let store = store().await;

    etl::run(&store, &fixture.titles, &fixture.credits, None)
        .await
        .unwrap();
    let before = store.table_counts().await.unwrap();

    let report = etl::run(&store, &fixture.titles, &fixture.credits, None)
        .await
        .unwrap();
    let after = store.table_counts().await.unwrap();

    assert_eq!(report.total_inserted(), 0);
    assert_eq!(report.table("movies").skipped, 2);
    assert_eq!(report.table("genres").skipped, 4);
    assert_eq!(report.table("people").skipped, 4);
    assert_eq!(report.table("ratings").skipped, 3);

    assert_eq!(before.genres, after.genres);
    assert_eq!(before.people, after.people);
    assert_eq!(before.movies, after.movies);
    assert_eq!(before.ratings, after.ratings);
}

#[tokio::test]
async fn rejected_rows_are_reported_and_logged() {
    let fixture = Fixture::new();
    let store = store().await;

    let report = etl::run(
        &store,
        &fixture.titles,
        &fixture.credits,
        Some(&fixture.reject_log),
    )
    .await
    .unwrap();

    // tm2 (no title), tm4 (bad year), tm99 credit, PRODUCER credit
    assert_eq!(report.rejected.len(), 4);
    assert!(
        report
            .rejected
            .iter()
            .all(|r| r.stage == RejectStage::Normalize)
    );
    assert!(
        report
            .rejected
            .iter()
            .any(|r| r.key.as_deref() == Some("tm2") && r.reason.contains("title"))
    );

    assert!(store.movies().find_id("tm2").await.unwrap().is_none());
    assert!(store.movies().find_id("tm4").await.unwrap().is_none());

    let log = std::fs::read_to_string(&fixture.reject_log).unwrap();
    let lines: Vec<serde_json::Value> = log
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().any(|l| l["origin"] == "credits"));
}

#[tokio::test]
async fn loaded_data_is_searchable() {
    let fixture = Fixture::new();
    let store = store().await;
    etl::run(&store, &fixture.titles, &fixture.credits, None)
        .await
        .unwrap();

    let dramas = store
        .movies()
        .list(&TitleFilter {
            genre: Some("DRAMA".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(dramas.len(), 1);
    assert_eq!(dramas[0].source_id, "tm1");

    let pacino = store.movies().by_actor("pacino", 10).await.unwrap();
    let ids: Vec<_> = pacino.iter().map(|m| m.source_id.as_str()).collect();
    assert_eq!(ids, vec!["tm1", "tm3"]);

    let rows = store
        .media()
        .search(&MediaFilter {
            character: Some("jonas".to_string()),
            limit: 100,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.media_type == "show" && r.source_id == "ts1"));

    let directed = store
        .media()
        .search(&MediaFilter {
            director: Some("mann".to_string()),
            limit: 100,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(directed.iter().all(|r| r.source_id == "tm1"));
    assert!(!directed.is_empty());
}

#[tokio::test]
async fn database_failures_are_counted_and_the_load_continues() {
    let fixture = Fixture::new();
    let store = store().await;
    store
        .conn
        .execute_unprepared(
            "CREATE TRIGGER block_crime BEFORE INSERT ON genres \
             WHEN NEW.normalized_name = 'crime' \
             BEGIN SELECT RAISE(ABORT, 'crime is blocked'); END",
        )
        .await
        .unwrap();

    let report = etl::run(&store, &fixture.titles, &fixture.credits, None)
        .await
        .unwrap();

    let genres = report.table("genres");
    assert_eq!((genres.inserted, genres.failed), (3, 1));
    let movie_genres = report.table("movie_genres");
    assert_eq!((movie_genres.inserted, movie_genres.failed), (2, 1));
    assert_eq!(report.table("show_genres").inserted, 2);
    assert_eq!(report.table("movies").inserted, 2);
    assert_eq!(report.table("people").inserted, 4);

    let load_rejects: Vec<_> = report
        .rejected
        .iter()
        .filter(|r| r.stage == RejectStage::Load)
        .collect();
    assert_eq!(load_rejects.len(), 2);
    assert!(load_rejects.iter().any(|r| r.origin == "genres"));
    assert!(load_rejects.iter().any(|r| r.origin == "movie_genres"));

    let heat = store.movies().get("tm1").await.unwrap();
    assert_eq!(heat.genres, vec!["drama".to_string()]);
}

#[tokio::test]
async fn missing_input_file_is_fatal() {
    let store = store().await;
    let missing = std::env::temp_dir().join(format!("reelbase-missing-{}.csv", uuid::Uuid::new_v4()));

    let result = etl::run(&store, &missing, &missing, None).await;
    assert!(matches!(result, Err(etl::EtlError::Open { .. })));
}
