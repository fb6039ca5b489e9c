use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// ISO 3166-1 alpha-2 code as spelled in the source
    pub code: String,
    #[sea_orm(unique)]
    pub normalized_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_countries::Entity")]
    MovieCountries,
    #[sea_orm(has_many = "super::show_countries::Entity")]
    ShowCountries,
}

impl Related<super::movie_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCountries.def()
    }
}

impl Related<super::show_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCountries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
