//! Audit log entity.
//!
//! Rows are appended in the same transaction as the write they describe.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Action kind, e.g. "RESULT_CREATE" or "RESULT_UPDATE".
    pub action: String,

    /// Entity kind the action applied to.
    pub entity: String,

    #[sea_orm(indexed)]
    pub entity_id: String,

    pub old_value: Option<Json>,
    pub new_value: Option<Json>,

    /// The user who performed the action.
    #[sea_orm(indexed)]
    pub actor_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
