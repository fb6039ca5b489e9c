use super::normalize::{LookupTable, NormalizedDataset, TitleLink};
use super::{LoadReport, Outcome, RejectStage, RowError};
use crate::db::repositories::rating::NewRating;
use crate::db::{Store, StoreError, StoreResult};
use crate::domain::{IMDB_SOURCE, TitleKind};
use std::collections::HashMap;
use tracing::{debug, info, warn};

type ParentIds = HashMap<(TitleKind, String), i32>;
type AttributeIds = HashMap<usize, i32>;

fn title_table(kind: TitleKind) -> &'static str {
    match kind {
        TitleKind::Movie => "movies",
        TitleKind::Show => "shows",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Genre,
    Country,
    Person,
    Character,
}

impl Attribute {
    const fn table(self) -> &'static str {
        match self {
            Self::Genre => "genres",
            Self::Country => "countries",
            Self::Person => "people",
            Self::Character => "characters",
        }
    }

    /// Join table linking a title of `kind` to this attribute.
    const fn link_table(self, kind: TitleKind) -> &'static str {
        match (kind, self) {
            (TitleKind::Movie, Self::Genre) => "movie_genres",
            (TitleKind::Show, Self::Genre) => "show_genres",
            (TitleKind::Movie, Self::Country) => "movie_countries",
            (TitleKind::Show, Self::Country) => "show_countries",
            (TitleKind::Movie, Self::Person) => "movie_credits",
            (TitleKind::Show, Self::Person) => "show_credits",
            (TitleKind::Movie, Self::Character) => "movie_characters",
            (TitleKind::Show, Self::Character) => "show_characters",
        }
    }
}

/// Writes a normalized dataset, parents first, one row at a time.
///
/// Nothing is wrapped in a transaction: a failing row is logged, counted and
/// skipped. Running the same dataset twice reports the second run's rows as
/// skipped.
pub async fn load(store: &Store, dataset: &NormalizedDataset) -> LoadReport {
    let mut loader = Loader {
        store,
        report: LoadReport::default(),
    };

    let parents = loader.titles(dataset).await;

    let genres = loader.attributes(Attribute::Genre, &dataset.genres).await;
    let countries = loader
        .attributes(Attribute::Country, &dataset.countries)
        .await;
    let people = loader.attributes(Attribute::Person, &dataset.people).await;
    let characters = loader
        .attributes(Attribute::Character, &dataset.characters)
        .await;

    loader
        .title_links(Attribute::Genre, &dataset.genre_links, &parents, &genres)
        .await;
    loader
        .title_links(
            Attribute::Country,
            &dataset.country_links,
            &parents,
            &countries,
        )
        .await;
    loader.credits(dataset, &parents, &people).await;
    loader
        .characters(dataset, &parents, &people, &characters)
        .await;
    loader.ratings(dataset, &parents).await;

    let report = loader.report;
    info!(
        "Load finished: {} rows inserted, {} failed",
        report.total_inserted(),
        report.total_failed()
    );
    report
}

struct Loader<'a> {
    store: &'a Store,
    report: LoadReport,
}

impl Loader<'_> {
    fn outcome(&mut self, table: &'static str, written: bool) {
        self.report.record(
            table,
            if written {
                Outcome::Inserted
            } else {
                Outcome::Skipped
            },
        );
    }

    fn fail(
        &mut self,
        table: &'static str,
        key: Option<&str>,
        line: Option<u64>,
        reason: String,
    ) {
        warn!(table, key, line, "Row not loaded: {}", reason);
        self.report.record(table, Outcome::Failed);
        self.report.rejected.push(RowError::new(
            RejectStage::Load,
            table,
            line,
            key.map(str::to_string),
            reason,
        ));
    }

    async fn titles(&mut self, dataset: &NormalizedDataset) -> ParentIds {
        let mut ids = ParentIds::new();

        for item in &dataset.titles {
            let table = title_table(item.kind);
            let source_id = item.title.source_id.as_str();

            let written = match item.kind {
                TitleKind::Movie => self.store.movies().insert_if_absent(&item.title).await,
                TitleKind::Show => self.store.shows().insert_if_absent(&item.title).await,
            };

            let id = match written {
                Ok(written) => {
                    self.outcome(table, written);
                    self.parent_id(item.kind, source_id).await
                }
                Err(e) => {
                    self.fail(
                        table,
                        Some(source_id),
                        Some(item.line),
                        format!(
                            "{e} (title={:?}, release_year={})",
                            item.title.title, item.title.release_year
                        ),
                    );
                    continue;
                }
            };

            match id {
                Ok(Some(id)) => {
                    ids.insert((item.kind, source_id.to_string()), id);
                }
                Ok(None) => debug!(source_id = %source_id, "Title vanished after insert"),
                Err(e) => warn!(source_id = %source_id, "Failed to resolve title id: {}", e),
            }
        }

        ids
    }

    async fn parent_id(&self, kind: TitleKind, source_id: &str) -> StoreResult<Option<i32>> {
        match kind {
            TitleKind::Movie => self.store.movies().find_id(source_id).await,
            TitleKind::Show => self.store.shows().find_id(source_id).await,
        }
    }

    async fn attributes(&mut self, attribute: Attribute, lookup: &LookupTable) -> AttributeIds {
        let table = attribute.table();
        let mut ids = AttributeIds::new();

        for entry in lookup.entries() {
            let result = match attribute {
                Attribute::Genre => self
                    .store
                    .genres()
                    .find_or_create(&entry.name)
                    .await
                    .map(|(m, created)| (m.id, created)),
                Attribute::Country => self
                    .store
                    .countries()
                    .find_or_create(&entry.name)
                    .await
                    .map(|(m, created)| (m.id, created)),
                Attribute::Person => self
                    .store
                    .people()
                    .find_or_create(&entry.name, entry.external_id.as_deref())
                    .await
                    .map(|(m, created)| (m.id, created)),
                Attribute::Character => self
                    .store
                    .characters()
                    .find_or_create(&entry.name)
                    .await
                    .map(|(m, created)| (m.id, created)),
            };

            match result {
                Ok((id, created)) => {
                    self.outcome(table, created);
                    ids.insert(entry.id, id);
                }
                Err(e) => self.fail(table, Some(entry.name.as_str()), None, e.to_string()),
            }
        }

        ids
    }

    /// Resolves both ends of a link; `None` means the row was counted as failed.
    fn resolve(
        &mut self,
        table: &'static str,
        parents: &ParentIds,
        kind: TitleKind,
        source_id: &str,
        attribute: Option<i32>,
    ) -> Option<(i32, i32)> {
        let Some(parent) = parents.get(&(kind, source_id.to_string())).copied() else {
            self.fail(table, Some(source_id), None, "parent title not loaded".to_string());
            return None;
        };
        let Some(attribute) = attribute else {
            self.fail(table, Some(source_id), None, "attribute row not loaded".to_string());
            return None;
        };
        Some((parent, attribute))
    }

    fn finish(&mut self, table: &'static str, source_id: &str, result: Result<bool, StoreError>) {
        match result {
            Ok(written) => self.outcome(table, written),
            Err(e) => self.fail(table, Some(source_id), None, e.to_string()),
        }
    }

    async fn title_links(
        &mut self,
        linked: Attribute,
        links: &[TitleLink],
        parents: &ParentIds,
        attributes: &AttributeIds,
    ) {
        for link in links {
            let table = linked.link_table(link.kind);
            let attribute = attributes.get(&link.attribute).copied();
            let Some((parent, attribute)) =
                self.resolve(table, parents, link.kind, &link.source_id, attribute)
            else {
                continue;
            };

            let result = if linked == Attribute::Genre {
                self.store
                    .links()
                    .link_genre(link.kind, parent, attribute)
                    .await
            } else {
                self.store
                    .links()
                    .link_country(link.kind, parent, attribute)
                    .await
            };
            self.finish(table, &link.source_id, result);
        }
    }

    async fn credits(
        &mut self,
        dataset: &NormalizedDataset,
        parents: &ParentIds,
        people: &AttributeIds,
    ) {
        for credit in &dataset.credits {
            let table = Attribute::Person.link_table(credit.kind);
            let person = people.get(&credit.person).copied();
            let Some((parent, person)) =
                self.resolve(table, parents, credit.kind, &credit.source_id, person)
            else {
                continue;
            };

            let result = self
                .store
                .links()
                .link_credit(credit.kind, parent, person, credit.role)
                .await;
            self.finish(table, &credit.source_id, result);
        }
    }

    async fn characters(
        &mut self,
        dataset: &NormalizedDataset,
        parents: &ParentIds,
        people: &AttributeIds,
        characters: &AttributeIds,
    ) {
        for link in &dataset.character_links {
            let table = Attribute::Character.link_table(link.kind);
            let person = people.get(&link.person).copied();
            let character = characters.get(&link.character).copied();

            let Some((parent, person)) =
                self.resolve(table, parents, link.kind, &link.source_id, person)
            else {
                continue;
            };
            let Some(character) = character else {
                self.fail(
                    table,
                    Some(link.source_id.as_str()),
                    None,
                    "character row not loaded".to_string(),
                );
                continue;
            };

            let result = self
                .store
                .links()
                .link_character(link.kind, parent, person, character)
                .await;
            self.finish(table, &link.source_id, result);
        }
    }

    async fn ratings(&mut self, dataset: &NormalizedDataset, parents: &ParentIds) {
        const TABLE: &str = "ratings";

        for rating in &dataset.ratings {
            let Some(parent_id) = parents
                .get(&(rating.kind, rating.source_id.clone()))
                .copied()
            else {
                self.fail(
                    TABLE,
                    Some(rating.source_id.as_str()),
                    None,
                    "parent title not loaded".to_string(),
                );
                continue;
            };

            let new = NewRating {
                kind: rating.kind,
                parent_id,
                source: IMDB_SOURCE.to_string(),
                external_id: rating.external_id.clone(),
                score: rating.score,
                votes: rating.votes,
            };

            let result = self.store.ratings().insert_if_absent(&new).await;
            self.finish(TABLE, &rating.source_id, result);
        }
    }
}
