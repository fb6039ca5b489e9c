use reelbase::db::{MediaFilter, NewTitle, Store, TitleChanges, TitleFilter};
use reelbase::domain::TitleKind;
use sea_orm::ConnectionTrait;

async fn store() -> Store {
    Store::new("sqlite::memory:").await.unwrap()
}

fn new_movie(source_id: &str, title: &str, cert: &str) -> NewTitle {
    NewTitle {
        source_id: source_id.to_string(),
        title: title.to_string(),
        release_year: 1995,
        age_certification: Some(cert.to_string()),
        runtime: 120,
        seasons: None,
        description: None,
    }
}

async fn block_genre_links(store: &Store) {
    store
        .conn
        .execute_unprepared(
            "CREATE TRIGGER block_links BEFORE INSERT ON movie_genres \
             BEGIN SELECT RAISE(ABORT, 'links are blocked'); END",
        )
        .await
        .unwrap();
}

async fn unblock_genre_links(store: &Store) {
    store
        .conn
        .execute_unprepared("DROP TRIGGER block_links")
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_create_leaves_nothing_behind() {
    let store = store().await;
    block_genre_links(&store).await;

    let result = store
        .create_title(
            TitleKind::Movie,
            &new_movie("tm1", "Heat", "R"),
            &["Drama".to_string()],
        )
        .await;
    assert!(result.is_err());
    assert!(store.movies().find_id("tm1").await.unwrap().is_none());
    assert_eq!(store.table_counts().await.unwrap().genres, 0);

    unblock_genre_links(&store).await;
    let movie = store
        .create_title(
            TitleKind::Movie,
            &new_movie("tm1", "Heat", "R"),
            &["Drama".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(movie.genres, vec!["Drama".to_string()]);
}

#[tokio::test]
async fn failed_update_keeps_previous_state() {
    let store = store().await;
    store
        .create_title(
            TitleKind::Movie,
            &new_movie("tm1", "Heat", "R"),
            &["Drama".to_string()],
        )
        .await
        .unwrap();
    block_genre_links(&store).await;

    let changes = TitleChanges {
        title: Some("Heat (1995)".to_string()),
        ..Default::default()
    };
    let genres = ["Crime".to_string()];
    let result = store
        .update_title(TitleKind::Movie, "tm1", &changes, Some(&genres))
        .await;
    assert!(result.is_err());

    let movie = store.movies().get("tm1").await.unwrap();
    assert_eq!(movie.title, "Heat");
    assert_eq!(movie.genres, vec!["Drama".to_string()]);
}

#[tokio::test]
async fn like_wildcards_in_filters_are_literal() {
    let store = store().await;
    for (id, title, cert) in [
        ("tm1", "Heat", "PG-13"),
        ("tm2", "100% Wolf", "PG_13"),
    ] {
        store
            .create_title(TitleKind::Movie, &new_movie(id, title, cert), &[])
            .await
            .unwrap();
    }

    let by_title = |title: &str| TitleFilter {
        title: Some(title.to_string()),
        ..Default::default()
    };
    assert!(store.movies().list(&by_title("%%")).await.unwrap().is_empty());
    let wolf = store.movies().list(&by_title("0%")).await.unwrap();
    assert_eq!(wolf.len(), 1);
    assert_eq!(wolf[0].source_id, "tm2");

    let by_cert = store
        .movies()
        .list(&TitleFilter {
            age_certification: Some("pg-13".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_cert.len(), 1);
    assert_eq!(by_cert[0].source_id, "tm1");

    let media = store
        .media()
        .search(&MediaFilter {
            age_certification: Some("PG_13".to_string()),
            limit: 100,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(media.iter().all(|r| r.source_id == "tm2"));
    assert!(!media.is_empty());
}
