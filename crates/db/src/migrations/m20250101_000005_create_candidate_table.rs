//! Create candidate table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Candidate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidate::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidate::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Candidate::CandidateType).string_len(32).not_null())
                    .col(ColumnDef::new(Candidate::PartyId).string_len(32).not_null())
                    .col(ColumnDef::new(Candidate::ConstituencyId).string_len(32))
                    .col(
                        ColumnDef::new(Candidate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_party")
                            .from(Candidate::Table, Candidate::PartyId)
                            .to(Party::Table, Party::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_constituency")
                            .from(Candidate::Table, Candidate::ConstituencyId)
                            .to(Constituency::Table, Constituency::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: type (presidential scope resolution)
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_type")
                    .table(Candidate::Table)
                    .col(Candidate::CandidateType)
                    .to_owned(),
            )
            .await?;

        // Index: constituency (parliamentary scope resolution)
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_constituency_id")
                    .table(Candidate::Table)
                    .col(Candidate::ConstituencyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Candidate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Candidate {
    Table,
    Id,
    Name,
    CandidateType,
    PartyId,
    ConstituencyId,
    CreatedAt,
}

#[derive(Iden)]
enum Party {
    Table,
    Id,
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
}
