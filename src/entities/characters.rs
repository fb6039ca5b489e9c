use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "characters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub normalized_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_characters::Entity")]
    MovieCharacters,
    #[sea_orm(has_many = "super::show_characters::Entity")]
    ShowCharacters,
}

impl Related<super::movie_characters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCharacters.def()
    }
}

impl Related<super::show_characters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCharacters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
