use crate::db::StoreResult;
use crate::domain::{CreditRole, TitleKind};
use crate::entities::{
    movie_characters, movie_countries, movie_credits, movie_genres, prelude::*, show_characters,
    show_countries, show_credits, show_genres,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Join-table writes. Every insert is `ON CONFLICT DO NOTHING` on the
/// composite key and reports whether a row was actually written.
pub struct LinkRepository {
    conn: DatabaseConnection,
}

impl LinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn link_genre(
        &self,
        kind: TitleKind,
        parent_id: i32,
        genre_id: i32,
    ) -> StoreResult<bool> {
        Self::link_genre_in(&self.conn, kind, parent_id, genre_id).await
    }

    pub async fn link_genre_in<C: ConnectionTrait>(
        conn: &C,
        kind: TitleKind,
        parent_id: i32,
        genre_id: i32,
    ) -> StoreResult<bool> {
        let rows = match kind {
            TitleKind::Movie => {
                MovieGenres::insert(movie_genres::ActiveModel {
                    movie_id: Set(parent_id),
                    genre_id: Set(genre_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_genres::Column::MovieId,
                        movie_genres::Column::GenreId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?
            }
            TitleKind::Show => {
                ShowGenres::insert(show_genres::ActiveModel {
                    show_id: Set(parent_id),
                    genre_id: Set(genre_id),
                })
                .on_conflict(
                    OnConflict::columns([show_genres::Column::ShowId, show_genres::Column::GenreId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(conn)
                .await?
            }
        };

        Ok(rows > 0)
    }

    pub async fn clear_genres_in<C: ConnectionTrait>(
        conn: &C,
        kind: TitleKind,
        parent_id: i32,
    ) -> StoreResult<u64> {
        let res = match kind {
            TitleKind::Movie => {
                MovieGenres::delete_many()
                    .filter(movie_genres::Column::MovieId.eq(parent_id))
                    .exec(conn)
                    .await?
            }
            TitleKind::Show => {
                ShowGenres::delete_many()
                    .filter(show_genres::Column::ShowId.eq(parent_id))
                    .exec(conn)
                    .await?
            }
        };

        Ok(res.rows_affected)
    }

    pub async fn link_country(
        &self,
        kind: TitleKind,
        parent_id: i32,
        country_id: i32,
    ) -> StoreResult<bool> {
        let rows = match kind {
            TitleKind::Movie => {
                MovieCountries::insert(movie_countries::ActiveModel {
                    movie_id: Set(parent_id),
                    country_id: Set(country_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_countries::Column::MovieId,
                        movie_countries::Column::CountryId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
            TitleKind::Show => {
                ShowCountries::insert(show_countries::ActiveModel {
                    show_id: Set(parent_id),
                    country_id: Set(country_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        show_countries::Column::ShowId,
                        show_countries::Column::CountryId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
        };

        Ok(rows > 0)
    }

    pub async fn link_credit(
        &self,
        kind: TitleKind,
        parent_id: i32,
        person_id: i32,
        role: CreditRole,
    ) -> StoreResult<bool> {
        let role = role.as_str().to_string();

        let rows = match kind {
            TitleKind::Movie => {
                MovieCredits::insert(movie_credits::ActiveModel {
                    movie_id: Set(parent_id),
                    person_id: Set(person_id),
                    role: Set(role),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_credits::Column::MovieId,
                        movie_credits::Column::PersonId,
                        movie_credits::Column::Role,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
            TitleKind::Show => {
                ShowCredits::insert(show_credits::ActiveModel {
                    show_id: Set(parent_id),
                    person_id: Set(person_id),
                    role: Set(role),
                })
                .on_conflict(
                    OnConflict::columns([
                        show_credits::Column::ShowId,
                        show_credits::Column::PersonId,
                        show_credits::Column::Role,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
        };

        Ok(rows > 0)
    }

    pub async fn link_character(
        &self,
        kind: TitleKind,
        parent_id: i32,
        person_id: i32,
        character_id: i32,
    ) -> StoreResult<bool> {
        let rows = match kind {
            TitleKind::Movie => {
                MovieCharacters::insert(movie_characters::ActiveModel {
                    movie_id: Set(parent_id),
                    person_id: Set(person_id),
                    character_id: Set(character_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_characters::Column::MovieId,
                        movie_characters::Column::PersonId,
                        movie_characters::Column::CharacterId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
            TitleKind::Show => {
                ShowCharacters::insert(show_characters::ActiveModel {
                    show_id: Set(parent_id),
                    person_id: Set(person_id),
                    character_id: Set(character_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        show_characters::Column::ShowId,
                        show_characters::Column::PersonId,
                        show_characters::Column::CharacterId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?
            }
        };

        Ok(rows > 0)
    }
}
