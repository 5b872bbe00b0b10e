//! Announcement service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::announcement::{self, AnnouncementCategory, Audience, Priority};
use campus_db::repositories::{AnnouncementFilter, AnnouncementRepository};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::access::{Actor, require_admin};
use crate::pagination::{PageRequest, Paged};

/// Input for publishing an announcement.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAnnouncementInput {
    #[validate(length(min = 1, max = 100, message = "Title is required (max 100 chars)"))]
    pub title: String,

    #[validate(length(min = 1, max = 1000, message = "Content is required (max 1000 chars)"))]
    pub content: String,

    pub category: AnnouncementCategory,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub target_audience: Audience,

    pub expiry_date: Option<DateTime<Utc>>,
}

/// Partial update.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAnnouncementInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,

    pub category: Option<AnnouncementCategory>,

    pub priority: Option<Priority>,

    pub target_audience: Option<Audience>,

    pub is_active: Option<bool>,

    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnouncementsQuery {
    pub category: Option<AnnouncementCategory>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Like toggle result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub liked: bool,
    pub likes_count: usize,
}

/// Audiences a caller may see. Admins see everything.
fn visible_audiences(actor: &Actor) -> Option<Vec<Audience>> {
    if actor.is_admin() {
        None
    } else {
        Some(vec![Audience::All, Audience::Students])
    }
}

/// Service for campus announcements.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    id_gen: IdGenerator,
}

impl AnnouncementService {
    #[must_use]
    pub const fn new(announcement_repo: AnnouncementRepository) -> Self {
        Self {
            announcement_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish an announcement (admin only).
    pub async fn create(
        &self,
        author: &Actor,
        input: CreateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        require_admin(author, "publish announcements")?;
        input.validate()?;

        let model = announcement::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            content: Set(input.content.trim().to_string()),
            category: Set(input.category),
            priority: Set(input.priority),
            target_audience: Set(input.target_audience),
            author_id: Set(author.id.clone()),
            is_active: Set(true),
            expiry_date: Set(input.expiry_date),
            views: Set(0),
            liker_ids: Set(serde_json::json!([])),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.announcement_repo.create(model).await?;
        info!(user_id = %author.id, announcement_id = %created.id, "Announcement created");
        Ok(created)
    }

    /// Update an announcement (admin only).
    pub async fn update(
        &self,
        id: &str,
        editor: &Actor,
        input: UpdateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        require_admin(editor, "edit announcements")?;
        input.validate()?;

        let existing = self.announcement_repo.get_by_id(id).await?;
        let mut active: announcement::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(content) = input.content {
            active.content = Set(content.trim().to_string());
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        if let Some(audience) = input.target_audience {
            active.target_audience = Set(audience);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if input.expiry_date.is_some() {
            active.expiry_date = Set(input.expiry_date);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = self.announcement_repo.update(active).await?;
        info!(user_id = %editor.id, announcement_id = %id, "Announcement updated");
        Ok(updated)
    }

    /// Delete an announcement (admin only).
    pub async fn delete(&self, id: &str, editor: &Actor) -> AppResult<()> {
        require_admin(editor, "delete announcements")?;
        self.announcement_repo.get_by_id(id).await?;
        self.announcement_repo.delete(id).await?;
        info!(user_id = %editor.id, announcement_id = %id, "Announcement deleted");
        Ok(())
    }

    /// Fetch one announcement and count the view.
    pub async fn get(&self, id: &str) -> AppResult<announcement::Model> {
        let mut found = self.announcement_repo.get_by_id(id).await?;
        self.announcement_repo.increment_views(id).await?;
        found.views += 1;
        Ok(found)
    }

    /// Toggle the caller's like.
    pub async fn like(&self, id: &str, caller: &Actor) -> AppResult<LikeOutcome> {
        let updated = self
            .announcement_repo
            .toggle_liker(id, &caller.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {id}")))?;
        let likers = updated.likers();
        let liked = likers.contains(&caller.id);

        info!(user_id = %caller.id, announcement_id = %id, liked, "Announcement like toggled");
        Ok(LikeOutcome {
            liked,
            likes_count: likers.len(),
        })
    }

    /// Visible announcements, newest first.
    pub async fn list(
        &self,
        caller: &Actor,
        query: ListAnnouncementsQuery,
    ) -> AppResult<Paged<announcement::Model>> {
        let page = PageRequest::new(query.page, query.limit)?;
        let filter = AnnouncementFilter {
            category: query.category,
            priority: query.priority,
            search: query.search,
            audiences: visible_audiences(caller),
            include_hidden: false,
        };
        let now = Utc::now();

        let items = self
            .announcement_repo
            .list(&filter, now, page.limit, page.offset())
            .await?;
        let total = self.announcement_repo.count(&filter, now).await?;

        Ok(Paged {
            items,
            pagination: page.summarize(total),
        })
    }
}
