//! Create announcement table migration.

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
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Announcement::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Announcement::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Announcement::Content).text().not_null())
                    .col(ColumnDef::new(Announcement::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Announcement::Priority).string_len(8).not_null().default("medium"))
                    .col(ColumnDef::new(Announcement::TargetAudience).string_len(16).not_null().default("all"))
                    .col(ColumnDef::new(Announcement::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Announcement::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Announcement::ExpiryDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Announcement::Views).integer().not_null().default(0))
                    .col(ColumnDef::new(Announcement::LikerIds).json_binary().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_author")
                            .from(Announcement::Table, Announcement::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (category, priority)
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_category_priority")
                    .table(Announcement::Table)
                    .col(Announcement::Category)
                    .col(Announcement::Priority)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_created_at")
                    .table(Announcement::Table)
                    .col(Announcement::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    Title,
    Content,
    Category,
    Priority,
    TargetAudience,
    AuthorId,
    IsActive,
    ExpiryDate,
    Views,
    LikerIds,
    CreatedAt,
    UpdatedAt,
}
