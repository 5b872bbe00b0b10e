//! Lost-and-found lifecycle: create, claim, verify, and the plain CRUD around it.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::{
        lost_found_item::{self, ItemCategory, ItemImage, ItemStatus, ItemType},
        user,
    },
    repositories::{LostFoundFilter, LostFoundRepository},
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::Set;
use serde::{Deserialize, de::IgnoredAny};
use tracing::info;
use validator::Validate;

use super::access::{Actor, require_owner_or_admin};
use super::user::validate_phone;
use crate::pagination::{PageRequest, Paged};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CODE_LEN: usize = 6;

/// Contact details shown on an item.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    #[validate(email(message = "Valid email required"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

/// Input for reporting a lost or found item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 100, message = "Title is required (max 100 chars)"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Description is required (max 500 chars)"))]
    pub description: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    pub category: ItemCategory,

    #[validate(length(min = 1, max = 50, message = "Item name is required (max 50 chars)"))]
    pub item_name: String,

    #[validate(length(max = 30))]
    pub brand: Option<String>,

    #[validate(length(max = 20))]
    pub color: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Location is required (max 100 chars)"))]
    pub location: String,

    pub date_time: DateTime<Utc>,

    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,

    #[serde(default)]
    pub images: Vec<ItemImage>,

    #[serde(default)]
    pub is_reward: bool,

    #[validate(range(min = 0.0, message = "Reward cannot be negative"))]
    pub reward_amount: Option<f64>,
}

/// Partial update. `type`, `status` and `submittedBy` are accepted by the
/// parser only so they can be rejected with a clear message.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateItemInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,

    pub category: Option<ItemCategory>,

    #[validate(length(min = 1, max = 50))]
    pub item_name: Option<String>,

    #[validate(length(max = 30))]
    pub brand: Option<String>,

    #[validate(length(max = 20))]
    pub color: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,

    pub date_time: Option<DateTime<Utc>>,

    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,

    pub images: Option<Vec<ItemImage>>,

    pub is_reward: Option<bool>,

    #[validate(range(min = 0.0))]
    pub reward_amount: Option<f64>,

    #[serde(rename = "type")]
    pub item_type: Option<IgnoredAny>,

    pub status: Option<IgnoredAny>,

    pub submitted_by: Option<IgnoredAny>,
}

impl UpdateItemInput {
    fn protected_fields(&self) -> Vec<&'static str> {
        [
            ("type", self.item_type.is_some()),
            ("status", self.status.is_some()),
            ("submittedBy", self.submitted_by.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

/// List query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    pub category: Option<ItemCategory>,
    pub status: Option<ItemStatus>,
    pub search: Option<String>,
    #[serde(default)]
    pub mine: bool,
    #[serde(default)]
    pub include_expired: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Result of a successful claim. The code goes to the claimant only.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub item: lost_found_item::Model,
    pub verification_code: String,
}

/// Random `A-Z0-9` claim code.
#[must_use]
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
        .collect()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn images_json(images: &[ItemImage]) -> AppResult<serde_json::Value> {
    serde_json::to_value(images)
        .map_err(|e| AppError::Internal(format!("Failed to encode images: {e}")))
}

/// Service for the lost-and-found board.
#[derive(Clone)]
pub struct LostFoundService {
    item_repo: LostFoundRepository,
    id_gen: IdGenerator,
    expiry: Duration,
}

impl LostFoundService {
    #[must_use]
    pub fn new(item_repo: LostFoundRepository, expiry_days: i64) -> Self {
        Self {
            item_repo,
            id_gen: IdGenerator::new(),
            expiry: Duration::days(expiry_days),
        }
    }

    /// Report an item. Missing contact details fall back to the submitter's profile.
    pub async fn create(
        &self,
        submitter: &user::Model,
        input: CreateItemInput,
    ) -> AppResult<lost_found_item::Model> {
        input.validate()?;

        let contact = input.contact_info.unwrap_or_default();
        let contact_email = trimmed(contact.email).or_else(|| Some(submitter.email.clone()));
        let contact_phone = trimmed(contact.phone).or_else(|| submitter.phone.clone());
        if contact_email.is_none() && contact_phone.is_none() {
            return Err(AppError::Validation(
                "An email or phone contact is required".to_string(),
            ));
        }

        let now = Utc::now();
        let model = lost_found_item::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            item_type: Set(input.item_type),
            category: Set(input.category),
            item_name: Set(input.item_name.trim().to_string()),
            brand: Set(trimmed(input.brand)),
            color: Set(trimmed(input.color)),
            location: Set(input.location.trim().to_string()),
            date_time: Set(input.date_time),
            contact_email: Set(contact_email),
            contact_phone: Set(contact_phone),
            submitted_by: Set(submitter.id.clone()),
            images: Set(images_json(&input.images)?),
            status: Set(ItemStatus::Active),
            claimed_by: Set(None),
            claimed_at: Set(None),
            verification_code: Set(None),
            is_reward: Set(input.is_reward),
            reward_amount: Set(input.reward_amount),
            expiry_date: Set(now + self.expiry),
            views: Set(0),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let item = self.item_repo.create(model).await?;
        info!(user_id = %submitter.id, item_id = %item.id, item_type = ?item.item_type, "Lost-found item created");
        Ok(item)
    }

    /// Fetch one item and count the view.
    pub async fn get(&self, id: &str) -> AppResult<lost_found_item::Model> {
        let mut item = self.item_repo.get_by_id(id).await?;
        self.item_repo.increment_views(id).await?;
        item.views += 1;
        Ok(item)
    }

    /// Claim an active item on behalf of `claimant`.
    pub async fn claim(&self, id: &str, claimant: &Actor) -> AppResult<ClaimOutcome> {
        let item = self.item_repo.get_by_id(id).await?;
        let now = Utc::now();

        if item.effective_status(now) != ItemStatus::Active {
            return Err(AppError::InvalidState(
                "Item is not available for claiming".to_string(),
            ));
        }
        if claimant.owns(&item.submitted_by) {
            return Err(AppError::Forbidden("You cannot claim your own item".to_string()));
        }

        let code = generate_verification_code();
        if !self
            .item_repo
            .try_claim(id, &claimant.id, &code, now)
            .await?
        {
            return Err(AppError::InvalidState(
                "Item is not available for claiming".to_string(),
            ));
        }

        let item = self.item_repo.get_by_id(id).await?;
        info!(user_id = %claimant.id, item_id = %id, "Lost-found item claimed");
        Ok(ClaimOutcome {
            item,
            verification_code: code,
        })
    }

    /// Confirm a return with the claimant's code. Only the submitter may verify.
    pub async fn verify(
        &self,
        id: &str,
        caller: &Actor,
        code: &str,
    ) -> AppResult<lost_found_item::Model> {
        let item = self.item_repo.get_by_id(id).await?;

        if !caller.owns(&item.submitted_by) {
            return Err(AppError::Forbidden(
                "Only the submitter can verify a return".to_string(),
            ));
        }
        if item.status != ItemStatus::Claimed {
            return Err(AppError::InvalidState("Item is not in claimed status".to_string()));
        }

        let supplied = code.trim().to_uppercase();
        if item.verification_code.as_deref() != Some(supplied.as_str()) {
            return Err(AppError::Validation("Invalid verification code".to_string()));
        }

        if !self.item_repo.try_mark_returned(id, Utc::now()).await? {
            return Err(AppError::InvalidState("Item is not in claimed status".to_string()));
        }

        let item = self.item_repo.get_by_id(id).await?;
        info!(user_id = %caller.id, item_id = %id, "Lost-found item returned");
        Ok(item)
    }

    /// Edit an item's descriptive fields. Never changes status, type or owner.
    pub async fn update(
        &self,
        id: &str,
        caller: &Actor,
        input: UpdateItemInput,
    ) -> AppResult<lost_found_item::Model> {
        let protected = input.protected_fields();
        if !protected.is_empty() {
            return Err(AppError::Validation(format!(
                "Cannot change {}",
                protected.join(", ")
            )));
        }
        input.validate()?;

        let item = self.item_repo.get_by_id(id).await?;
        require_owner_or_admin(caller, &item.submitted_by, "edit this item")?;

        let mut contact_email = item.contact_email.clone();
        let mut contact_phone = item.contact_phone.clone();
        if let Some(contact) = input.contact_info {
            contact_email = trimmed(contact.email);
            contact_phone = trimmed(contact.phone);
            if contact_email.is_none() && contact_phone.is_none() {
                return Err(AppError::Validation(
                    "An email or phone contact is required".to_string(),
                ));
            }
        }

        let mut active: lost_found_item::ActiveModel = item.into();

        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(item_name) = input.item_name {
            active.item_name = Set(item_name.trim().to_string());
        }
        if input.brand.is_some() {
            active.brand = Set(trimmed(input.brand));
        }
        if input.color.is_some() {
            active.color = Set(trimmed(input.color));
        }
        if let Some(location) = input.location {
            active.location = Set(location.trim().to_string());
        }
        if let Some(date_time) = input.date_time {
            active.date_time = Set(date_time);
        }
        if let Some(images) = input.images {
            active.images = Set(images_json(&images)?);
        }
        if let Some(is_reward) = input.is_reward {
            active.is_reward = Set(is_reward);
        }
        if input.reward_amount.is_some() {
            active.reward_amount = Set(input.reward_amount);
        }
        active.contact_email = Set(contact_email);
        active.contact_phone = Set(contact_phone);
        active.updated_at = Set(Some(Utc::now()));

        let item = self.item_repo.update(active).await?;
        info!(user_id = %caller.id, item_id = %item.id, "Lost-found item updated");
        Ok(item)
    }

    /// Remove an item (owner or admin).
    pub async fn delete(&self, id: &str, caller: &Actor) -> AppResult<()> {
        let item = self.item_repo.get_by_id(id).await?;
        require_owner_or_admin(caller, &item.submitted_by, "delete this item")?;

        self.item_repo.delete(id).await?;
        info!(user_id = %caller.id, item_id = %id, "Lost-found item deleted");
        Ok(())
    }

    /// Filtered, paginated board, newest first.
    pub async fn list(
        &self,
        caller: &Actor,
        query: ListItemsQuery,
    ) -> AppResult<Paged<lost_found_item::Model>> {
        let page = PageRequest::new(query.page, query.limit)?;
        let filter = LostFoundFilter {
            item_type: query.item_type,
            category: query.category,
            status: query.status,
            search: query.search,
            submitted_by: query.mine.then(|| caller.id.clone()),
            include_expired: query.include_expired,
        };
        let now = Utc::now();

        let items = self
            .item_repo
            .list(&filter, now, page.limit, page.offset())
            .await?;
        let total = self.item_repo.count(&filter, now).await?;

        Ok(Paged {
            items,
            pagination: page.summarize(total),
        })
    }
}
