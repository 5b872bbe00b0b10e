//! Create `personal_timetable` table migration.

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
                    .table(PersonalTimetable::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PersonalTimetable::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(PersonalTimetable::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(PersonalTimetable::Schedule).json_binary().not_null())
                    .col(
                        ColumnDef::new(PersonalTimetable::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PersonalTimetable::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personal_timetable_user")
                            .from(PersonalTimetable::Table, PersonalTimetable::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id (one timetable per user, upsert target)
        manager
            .create_index(
                Index::create()
                    .name("idx_personal_timetable_user_id")
                    .table(PersonalTimetable::Table)
                    .col(PersonalTimetable::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonalTimetable::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PersonalTimetable {
    Table,
    Id,
    UserId,
    Schedule,
    CreatedAt,
    UpdatedAt,
}
