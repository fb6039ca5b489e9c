use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Source dataset id (`ts...`)
    #[sea_orm(unique)]
    pub show_id: String,

    pub title: String,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub runtime: i32,
    pub seasons: Option<i32>,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show_genres::Entity")]
    ShowGenres,
    #[sea_orm(has_many = "super::show_countries::Entity")]
    ShowCountries,
    #[sea_orm(has_many = "super::show_credits::Entity")]
    ShowCredits,
    #[sea_orm(has_many = "super::show_characters::Entity")]
    ShowCharacters,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
}

impl Related<super::show_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowGenres.def()
    }
}

impl Related<super::show_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCountries.def()
    }
}

impl Related<super::show_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCredits.def()
    }
}

impl Related<super::show_characters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCharacters.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::show_genres::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::show_genres::Relation::Show.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
