//! Create polling station table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PollingStation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PollingStation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PollingStation::Code).string_len(64).not_null())
                    .col(ColumnDef::new(PollingStation::Name).string_len(256).not_null())
                    .col(ColumnDef::new(PollingStation::Location).string_len(512))
                    .col(
                        ColumnDef::new(PollingStation::ConstituencyId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PollingStation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_polling_station_constituency")
                            .from(PollingStation::Table, PollingStation::ConstituencyId)
                            .to(Constituency::Table, Constituency::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_polling_station_code")
                    .table(PollingStation::Table)
                    .col(PollingStation::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_polling_station_constituency_id")
                    .table(PollingStation::Table)
                    .col(PollingStation::ConstituencyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PollingStation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PollingStation {
    Table,
    Id,
    Code,
    Name,
    Location,
    ConstituencyId,
    CreatedAt,
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
}
