//! Create department timetable table migration.

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
                    .table(DepartmentTimetable::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DepartmentTimetable::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(DepartmentTimetable::Department).string_len(100).not_null())
                    .col(ColumnDef::new(DepartmentTimetable::Year).integer().not_null())
                    .col(ColumnDef::new(DepartmentTimetable::Semester).integer().not_null())
                    .col(ColumnDef::new(DepartmentTimetable::Section).string_len(16).not_null())
                    .col(ColumnDef::new(DepartmentTimetable::AcademicYear).string_len(9).not_null())
                    .col(ColumnDef::new(DepartmentTimetable::Schedule).json_binary().not_null())
                    .col(
                        ColumnDef::new(DepartmentTimetable::EffectiveFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentTimetable::EffectiveTo)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DepartmentTimetable::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(DepartmentTimetable::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(DepartmentTimetable::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DepartmentTimetable::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_timetable_created_by")
                            .from(DepartmentTimetable::Table, DepartmentTimetable::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One timetable per class and academic year
        manager
            .create_index(
                Index::create()
                    .name("idx_department_timetable_class")
                    .table(DepartmentTimetable::Table)
                    .col(DepartmentTimetable::Department)
                    .col(DepartmentTimetable::Year)
                    .col(DepartmentTimetable::Semester)
                    .col(DepartmentTimetable::Section)
                    .col(DepartmentTimetable::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (effective_from, effective_to)
        manager
            .create_index(
                Index::create()
                    .name("idx_department_timetable_effective")
                    .table(DepartmentTimetable::Table)
                    .col(DepartmentTimetable::EffectiveFrom)
                    .col(DepartmentTimetable::EffectiveTo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepartmentTimetable::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DepartmentTimetable {
    Table,
    Id,
    Department,
    Year,
    Semester,
    Section,
    AcademicYear,
    Schedule,
    EffectiveFrom,
    EffectiveTo,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
