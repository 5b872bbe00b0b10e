//! Announcement repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use super::{like_pattern, toggle_member};
use crate::entities::{
    Announcement,
    announcement::{self, AnnouncementCategory, Audience, Priority},
};

/// Announcement list filters.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementFilter {
    pub category: Option<AnnouncementCategory>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    /// Restrict to these audiences; `None` means every audience
    pub audiences: Option<Vec<Audience>>,
    /// Include inactive and expired announcements (admin view)
    pub include_hidden: bool,
}

impl AnnouncementFilter {
    fn condition(&self, now: DateTime<Utc>) -> Condition {
        use announcement::Column;

        let mut cond = Condition::all();

        if !self.include_hidden {
            cond = cond.add(Column::IsActive.eq(true)).add(
                Condition::any()
                    .add(Column::ExpiryDate.is_null())
                    .add(Column::ExpiryDate.gt(now)),
            );
        }
        if let Some(category) = self.category {
            cond = cond.add(Column::Category.eq(category));
        }
        if let Some(priority) = self.priority {
            cond = cond.add(Column::Priority.eq(priority));
        }
        if let Some(audiences) = &self.audiences {
            cond = cond.add(Column::TargetAudience.is_in(audiences.iter().copied()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            cond = cond.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Title))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(Column::Content))).like(&pattern)),
            );
        }

        cond
    }
}

/// Repository for announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find announcement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find announcement by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<announcement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {id}")))
    }

    /// Create an announcement.
    pub async fn create(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an announcement.
    pub async fn update(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Announcement::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Increment the view counter.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Announcement::update_many()
            .col_expr(
                announcement::Column::Views,
                Expr::col(announcement::Column::Views).add(1),
            )
            .filter(announcement::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Add or remove `user_id` from the likers in one statement.
    /// `None` when the announcement is gone.
    pub async fn toggle_liker(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<announcement::Model>> {
        let mut updated = Announcement::update_many()
            .col_expr(
                announcement::Column::LikerIds,
                toggle_member(announcement::Column::LikerIds, user_id),
            )
            .filter(announcement::Column::Id.eq(id))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(updated.pop())
    }

    /// List announcements, newest first.
    pub async fn list(
        &self,
        filter: &AnnouncementFilter,
        now: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .filter(filter.condition(now))
            .order_by(announcement::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count announcements matching `filter`.
    pub async fn count(&self, filter: &AnnouncementFilter, now: DateTime<Utc>) -> AppResult<u64> {
        Announcement::find()
            .filter(filter.condition(now))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
