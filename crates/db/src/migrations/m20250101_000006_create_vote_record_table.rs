//! Create vote record table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoteRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoteRecord::CandidateId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(VoteRecord::PollingStationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VoteRecord::Votes).integer().not_null())
                    .col(ColumnDef::new(VoteRecord::SubmittedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(VoteRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(VoteRecord::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_record_candidate")
                            .from(VoteRecord::Table, VoteRecord::CandidateId)
                            .to(Candidate::Table, Candidate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_record_polling_station")
                            .from(VoteRecord::Table, VoteRecord::PollingStationId)
                            .to(PollingStation::Table, PollingStation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_record_submitted_by")
                            .from(VoteRecord::Table, VoteRecord::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one record per (candidate, polling station) pair.
        // Concurrent duplicate submissions land here as a constraint violation.
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_record_candidate_station")
                    .table(VoteRecord::Table)
                    .col(VoteRecord::CandidateId)
                    .col(VoteRecord::PollingStationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: polling station (reporting-status queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_record_polling_station_id")
                    .table(VoteRecord::Table)
                    .col(VoteRecord::PollingStationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoteRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VoteRecord {
    Table,
    Id,
    CandidateId,
    PollingStationId,
    Votes,
    SubmittedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Candidate {
    Table,
    Id,
}

#[derive(Iden)]
enum PollingStation {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
