use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Parents first, join tables reference them.
        create(manager, &schema, Movies).await?;
        create(manager, &schema, Shows).await?;

        create(manager, &schema, Genres).await?;
        create(manager, &schema, Countries).await?;
        create(manager, &schema, People).await?;
        create(manager, &schema, Characters).await?;

        create(manager, &schema, MovieGenres).await?;
        create(manager, &schema, ShowGenres).await?;
        create(manager, &schema, MovieCountries).await?;
        create(manager, &schema, ShowCountries).await?;
        create(manager, &schema, MovieCredits).await?;
        create(manager, &schema, ShowCredits).await?;
        create(manager, &schema, MovieCharacters).await?;
        create(manager, &schema, ShowCharacters).await?;

        create(manager, &schema, Ratings).await?;
        create(manager, &schema, Predictions).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Predictions).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ratings).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ShowCharacters)
                    .table(MovieCharacters)
                    .table(ShowCredits)
                    .table(MovieCredits)
                    .table(ShowCountries)
                    .table(MovieCountries)
                    .table(ShowGenres)
                    .table(MovieGenres)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Characters)
                    .table(People)
                    .table(Countries)
                    .table(Genres)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Shows)
                    .table(Movies)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
