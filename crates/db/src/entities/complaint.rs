//! Complaint entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::announcement::Priority;

/// Complaint categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintCategory {
    #[sea_orm(string_value = "infrastructure")]
    Infrastructure,
    #[sea_orm(string_value = "food")]
    Food,
    #[sea_orm(string_value = "transport")]
    Transport,
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "hostel")]
    Hostel,
    #[sea_orm(string_value = "library")]
    Library,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Complaint handling status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    #[serde(rename = "resolved")]
    Resolved,
    #[sea_orm(string_value = "rejected")]
    #[serde(rename = "rejected")]
    Rejected,
}

impl ComplaintStatus {
    /// Whether the status can move from `self` to `next`.
    ///
    /// Progression is linear: pending, then in-progress, then resolved or
    /// rejected. Skipping in-progress is allowed; going back is not.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress | Self::Resolved | Self::Rejected)
                | (Self::InProgress, Self::Resolved | Self::Rejected)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: ComplaintCategory,

    pub priority: Priority,

    pub status: ComplaintStatus,

    pub submitted_by: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Hide the submitter from other students
    pub is_anonymous: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub admin_response: Option<String>,

    #[sea_orm(nullable)]
    pub responded_by: Option<String>,

    #[sea_orm(nullable)]
    pub responded_at: Option<DateTime<Utc>>,

    /// User IDs that upvoted
    #[sea_orm(column_type = "JsonBinary")]
    pub upvoter_ids: Json,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Decoded upvoter list.
    #[must_use]
    pub fn upvoters(&self) -> Vec<String> {
        serde_json::from_value(self.upvoter_ids.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubmittedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Submitter,

    #[sea_orm(has_many = "super::complaint_comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl Related<super::complaint_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
