//! Create constituency table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Constituency::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Constituency::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Constituency::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Constituency::Region).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Constituency::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_constituency_name")
                    .table(Constituency::Table)
                    .col(Constituency::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: region (for region-scoped aggregation)
        manager
            .create_index(
                Index::create()
                    .name("idx_constituency_region")
                    .table(Constituency::Table)
                    .col(Constituency::Region)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Constituency::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
    Name,
    Region,
    CreatedAt,
}
