//! Create `lost_found_item` table migration.

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
                    .table(LostFoundItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LostFoundItem::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LostFoundItem::Title).string_len(100).not_null())
                    .col(ColumnDef::new(LostFoundItem::Description).text().not_null())
                    .col(ColumnDef::new(LostFoundItem::ItemType).string_len(8).not_null())
                    .col(ColumnDef::new(LostFoundItem::Category).string_len(16).not_null())
                    .col(ColumnDef::new(LostFoundItem::ItemName).string_len(50).not_null())
                    .col(ColumnDef::new(LostFoundItem::Brand).string_len(30))
                    .col(ColumnDef::new(LostFoundItem::Color).string_len(20))
                    .col(ColumnDef::new(LostFoundItem::Location).string_len(100).not_null())
                    .col(ColumnDef::new(LostFoundItem::DateTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LostFoundItem::ContactEmail).string_len(256))
                    .col(ColumnDef::new(LostFoundItem::ContactPhone).string_len(16))
                    .col(ColumnDef::new(LostFoundItem::SubmittedBy).string_len(32).not_null())
                    .col(ColumnDef::new(LostFoundItem::Images).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(LostFoundItem::Status).string_len(16).not_null().default("active"))
                    .col(ColumnDef::new(LostFoundItem::ClaimedBy).string_len(32))
                    .col(ColumnDef::new(LostFoundItem::ClaimedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(LostFoundItem::VerificationCode).string_len(8))
                    .col(ColumnDef::new(LostFoundItem::IsReward).boolean().not_null().default(false))
                    .col(ColumnDef::new(LostFoundItem::RewardAmount).double())
                    .col(ColumnDef::new(LostFoundItem::ExpiryDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LostFoundItem::Views).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(LostFoundItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LostFoundItem::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_found_item_submitted_by")
                            .from(LostFoundItem::Table, LostFoundItem::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (item_type, category, status) for list filters
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_found_item_type_category_status")
                    .table(LostFoundItem::Table)
                    .col(LostFoundItem::ItemType)
                    .col(LostFoundItem::Category)
                    .col(LostFoundItem::Status)
                    .to_owned(),
            )
            .await?;

        // Index: submitted_by ("mine" toggle)
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_found_item_submitted_by")
                    .table(LostFoundItem::Table)
                    .col(LostFoundItem::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_found_item_created_at")
                    .table(LostFoundItem::Table)
                    .col(LostFoundItem::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LostFoundItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LostFoundItem {
    Table,
    Id,
    Title,
    Description,
    ItemType,
    Category,
    ItemName,
    Brand,
    Color,
    Location,
    DateTime,
    ContactEmail,
    ContactPhone,
    SubmittedBy,
    Images,
    Status,
    ClaimedBy,
    ClaimedAt,
    VerificationCode,
    IsReward,
    RewardAmount,
    ExpiryDate,
    Views,
    CreatedAt,
    UpdatedAt,
}
