//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_party_table;
mod m20250101_000003_create_constituency_table;
mod m20250101_000004_create_polling_station_table;
mod m20250101_000005_create_candidate_table;
mod m20250101_000006_create_vote_record_table;
mod m20250101_000007_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_party_table::Migration),
            Box::new(m20250101_000003_create_constituency_table::Migration),
            Box::new(m20250101_000004_create_polling_station_table::Migration),
            Box::new(m20250101_000005_create_candidate_table::Migration),
            Box::new(m20250101_000006_create_vote_record_table::Migration),
            Box::new(m20250101_000007_create_audit_log_table::Migration),
        ]
    }
}
