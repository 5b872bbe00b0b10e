//! Department timetable entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class-wide weekly schedule published by an admin.
///
/// Unique per (department, year, semester, section, academic year).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "department_timetable")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub department: String,

    /// Study year, 1-4.
    pub year: i32,

    /// Semester, 1-8.
    pub semester: i32,

    /// Uppercased section label.
    pub section: String,

    /// `YYYY-YYYY`
    pub academic_year: String,

    /// `[{ "day": "monday", "periods": [Period] }]`
    #[sea_orm(column_type = "JsonBinary")]
    pub schedule: Json,

    pub effective_from: DateTime<Utc>,

    pub effective_to: DateTime<Utc>,

    pub created_by: String,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Whether `now` falls inside the effective window (both ends inclusive).
    #[must_use]
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.effective_from <= now && now <= self.effective_to
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
