use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub normalized_name: String,

    /// `person_id` from the credits file, first one seen for this name
    pub external_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_credits::Entity")]
    MovieCredits,
    #[sea_orm(has_many = "super::show_credits::Entity")]
    ShowCredits,
}

impl Related<super::movie_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCredits.def()
    }
}

impl Related<super::show_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCredits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
