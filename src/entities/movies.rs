use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Source dataset id (`tm...`)
    #[sea_orm(unique)]
    pub movie_id: String,

    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_countries::Entity")]
    MovieCountries,
    #[sea_orm(has_many = "super::movie_credits::Entity")]
    MovieCredits,
    #[sea_orm(has_many = "super::movie_characters::Entity")]
    MovieCharacters,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCountries.def()
    }
}

impl Related<super::movie_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCredits.def()
    }
}

impl Related<super::movie_characters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCharacters.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
