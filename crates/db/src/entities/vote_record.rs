//! Vote record entity.
//!
//! One row per (candidate, polling station) pair; a unique index enforces
//! the no-double-count policy at the store level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_record")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub candidate_id: String,

    #[sea_orm(indexed)]
    pub polling_station_id: String,

    /// Vote count for the candidate at the station. Never negative.
    pub votes: i32,

    /// The polling officer who submitted the record.
    #[sea_orm(indexed)]
    pub submitted_by: String,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id",
        on_delete = "Cascade"
    )]
    Candidate,

    #[sea_orm(
        belongs_to = "super::polling_station::Entity",
        from = "Column::PollingStationId",
        to = "super::polling_station::Column::Id",
        on_delete = "Cascade"
    )]
    PollingStation,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubmittedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl Related<super::polling_station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PollingStation.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
