//! Constituency entity.

use sea_orm::ActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ghana's sixteen administrative regions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    #[sea_orm(string_value = "GREATER_ACCRA")]
    GreaterAccra,
    #[sea_orm(string_value = "ASHANTI")]
    Ashanti,
    #[sea_orm(string_value = "EASTERN")]
    Eastern,
    #[sea_orm(string_value = "CENTRAL")]
    Central,
    #[sea_orm(string_value = "WESTERN")]
    Western,
    #[sea_orm(string_value = "VOLTA")]
    Volta,
    #[sea_orm(string_value = "NORTHERN")]
    Northern,
    #[sea_orm(string_value = "UPPER_EAST")]
    UpperEast,
    #[sea_orm(string_value = "UPPER_WEST")]
    UpperWest,
    #[sea_orm(string_value = "SAVANNAH")]
    Savannah,
    #[sea_orm(string_value = "BONO")]
    Bono,
    #[sea_orm(string_value = "BONO_EAST")]
    BonoEast,
    #[sea_orm(string_value = "AHAFO")]
    Ahafo,
    #[sea_orm(string_value = "WESTERN_NORTH")]
    WesternNorth,
    #[sea_orm(string_value = "OTI")]
    Oti,
    #[sea_orm(string_value = "NORTH_EAST")]
    NorthEast,
}

impl Region {
    /// All regions, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        use sea_orm::Iterable;
        Self::iter()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.to_string()).map_err(|_| format!("unknown region: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "constituency")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(indexed)]
    pub region: Region,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::polling_station::Entity")]
    PollingStation,

    #[sea_orm(has_many = "super::candidate::Entity")]
    Candidate,
}

impl Related<super::polling_station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PollingStation.def()
    }
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_roundtrip() {
        let region: Region = "GREATER_ACCRA".parse().unwrap();
        assert_eq!(region, Region::GreaterAccra);
        assert_eq!(region.to_string(), "GREATER_ACCRA");
    }

    #[test]
    fn test_region_unknown() {
        assert!("ATLANTIS".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_count() {
        assert_eq!(Region::all().count(), 16);
    }
}
