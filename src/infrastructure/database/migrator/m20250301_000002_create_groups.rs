//! Create groups table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Title).string().not_null())
                    .col(ColumnDef::new(Groups::Subject).string().not_null())
                    .col(ColumnDef::new(Groups::Description).string().not_null())
                    .col(ColumnDef::new(Groups::Image).string().not_null())
                    .col(ColumnDef::new(Groups::Creator).string().not_null())
                    .col(ColumnDef::new(Groups::Members).json().not_null())
                    .col(
                        ColumnDef::new(Groups::MaxMembers)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(Groups::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Groups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Groups::Messages).json().not_null())
                    .col(ColumnDef::new(Groups::Materials).json().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Groups {
    Table,
    Id,
    Title,
    Subject,
    Description,
    Image,
    Creator,
    Members,
    MaxMembers,
    Status,
    CreatedAt,
    Messages,
    Materials,
}
