//! Polling station entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "polling_station")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Unique human identifier, e.g. "GA-001-A".
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    pub location: Option<String>,

    #[sea_orm(indexed)]
    pub constituency_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::constituency::Entity",
        from = "Column::ConstituencyId",
        to = "super::constituency::Column::Id",
        on_delete = "Cascade"
    )]
    Constituency,

    #[sea_orm(has_many = "super::vote_record::Entity")]
    VoteRecord,
}

impl Related<super::constituency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Constituency.def()
    }
}

impl Related<super::vote_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
