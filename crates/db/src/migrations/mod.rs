//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_lost_found_item_table;
mod m20250101_000003_create_personal_timetable_table;
mod m20250101_000004_create_announcement_table;
mod m20250101_000005_create_complaint_table;
mod m20250101_000006_create_complaint_comment_table;
mod m20250101_000007_create_department_timetable_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_lost_found_item_table::Migration),
            Box::new(m20250101_000003_create_personal_timetable_table::Migration),
            Box::new(m20250101_000004_create_announcement_table::Migration),
            Box::new(m20250101_000005_create_complaint_table::Migration),
            Box::new(m20250101_000006_create_complaint_comment_table::Migration),
            Box::new(m20250101_000007_create_department_timetable_table::Migration),
        ]
    }
}
