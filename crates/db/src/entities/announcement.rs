//! Announcement entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Announcement categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementCategory {
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "urgent")]
    Urgent,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "cultural")]
    Cultural,
}

/// Priority shared by announcements and complaints.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// Who an announcement is addressed to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "students")]
    Students,
    #[sea_orm(string_value = "faculty")]
    Faculty,
    #[sea_orm(string_value = "staff")]
    Staff,
}

/// Campus-wide notice published by an admin.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    /// Unique announcement ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Title of the announcement.
    pub title: String,

    /// Body text.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub category: AnnouncementCategory,

    pub priority: Priority,

    pub target_audience: Audience,

    /// Admin who published it.
    pub author_id: String,

    /// Whether the announcement is currently visible.
    pub is_active: bool,

    /// Hidden from lists after this instant (optional).
    #[sea_orm(nullable)]
    pub expiry_date: Option<DateTime<Utc>>,

    /// Detail view counter.
    pub views: i32,

    /// User IDs that liked it.
    #[sea_orm(column_type = "JsonBinary")]
    pub liker_ids: Json,

    /// When the announcement was created.
    pub created_at: DateTime<Utc>,

    /// When the announcement was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Decoded liker list.
    #[must_use]
    pub fn likers(&self) -> Vec<String> {
        serde_json::from_value(self.liker_ids.clone()).unwrap_or_default()
    }
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
