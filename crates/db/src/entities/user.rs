//! User entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Portal roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login email, stored lowercased
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    pub role: UserRole,

    /// 10-digit phone number
    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub student_id: Option<String>,

    #[sea_orm(nullable)]
    pub department: Option<String>,

    /// Year of study (1-4)
    #[sea_orm(nullable)]
    pub year: Option<i32>,

    /// Current bearer token
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Whether this user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lost_found_item::Entity")]
    LostFoundItems,

    #[sea_orm(has_one = "super::personal_timetable::Entity")]
    PersonalTimetable,

    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,
}

impl Related<super::lost_found_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostFoundItems.def()
    }
}

impl Related<super::personal_timetable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalTimetable.def()
    }
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
