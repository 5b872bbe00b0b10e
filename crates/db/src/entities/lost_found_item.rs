//! Lost-and-found item entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the submitter lost or found the item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[sea_orm(string_value = "lost")]
    Lost,
    #[sea_orm(string_value = "found")]
    Found,
}

/// Item categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    #[sea_orm(string_value = "electronics")]
    Electronics,
    #[sea_orm(string_value = "books")]
    Books,
    #[sea_orm(string_value = "clothing")]
    Clothing,
    #[sea_orm(string_value = "accessories")]
    Accessories,
    #[sea_orm(string_value = "documents")]
    Documents,
    #[sea_orm(string_value = "keys")]
    Keys,
    #[sea_orm(string_value = "bags")]
    Bags,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Lifecycle status.
///
/// `active -> claimed -> returned`, or `active -> expired`. `returned` and
/// `expired` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "claimed")]
    Claimed,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// One attached image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImage {
    pub url: String,
    pub filename: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_found_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub item_type: ItemType,

    pub category: ItemCategory,

    pub item_name: String,

    #[sea_orm(nullable)]
    pub brand: Option<String>,

    #[sea_orm(nullable)]
    pub color: Option<String>,

    pub location: String,

    /// When the item was lost or found
    pub date_time: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub contact_email: Option<String>,

    #[sea_orm(nullable)]
    pub contact_phone: Option<String>,

    pub submitted_by: String,

    /// `[{url, filename}]`
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    /// Stored status; see [`Model::effective_status`] for the read-time value
    pub status: ItemStatus,

    #[sea_orm(nullable)]
    pub claimed_by: Option<String>,

    #[sea_orm(nullable)]
    pub claimed_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub verification_code: Option<String>,

    pub is_reward: bool,

    #[sea_orm(nullable)]
    pub reward_amount: Option<f64>,

    pub expiry_date: DateTime<Utc>,

    pub views: i32,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Status as observed at `now`: an active item past its expiry date is expired.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> ItemStatus {
        if self.status == ItemStatus::Active && now > self.expiry_date {
            ItemStatus::Expired
        } else {
            self.status
        }
    }

    /// Decoded image list. Malformed stored JSON yields an empty list.
    #[must_use]
    pub fn image_list(&self) -> Vec<ItemImage> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
