//! Create complaint table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Complaint::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Complaint::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Complaint::Description).text().not_null())
                    .col(ColumnDef::new(Complaint::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Complaint::Priority).string_len(8).not_null().default("medium"))
                    .col(ColumnDef::new(Complaint::Status).string_len(16).not_null().default("pending"))
                    .col(ColumnDef::new(Complaint::SubmittedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Complaint::Location).string_len(100))
                    .col(ColumnDef::new(Complaint::IsAnonymous).boolean().not_null().default(false))
                    .col(ColumnDef::new(Complaint::AdminResponse).text())
                    .col(ColumnDef::new(Complaint::RespondedBy).string_len(32))
                    .col(ColumnDef::new(Complaint::RespondedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Complaint::UpvoterIds).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(Complaint::ResolvedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Complaint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Complaint::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_submitted_by")
                            .from(Complaint::Table, Complaint::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (category, status)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_category_status")
                    .table(Complaint::Table)
                    .col(Complaint::Category)
                    .col(Complaint::Status)
                    .to_owned(),
            )
            .await?;

        // Index: submitted_by
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_submitted_by")
                    .table(Complaint::Table)
                    .col(Complaint::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Complaint {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    Status,
    SubmittedBy,
    Location,
    IsAnonymous,
    AdminResponse,
    RespondedBy,
    RespondedAt,
    UpvoterIds,
    ResolvedAt,
    CreatedAt,
    UpdatedAt,
}
