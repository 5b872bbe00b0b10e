//! Lost-and-found repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use super::like_pattern;
use crate::entities::{
    LostFoundItem,
    lost_found_item::{self, ItemCategory, ItemStatus, ItemType},
};

/// List filters. Status matching applies lazy expiry.
#[derive(Debug, Clone, Default)]
pub struct LostFoundFilter {
    pub item_type: Option<ItemType>,
    pub category: Option<ItemCategory>,
    pub status: Option<ItemStatus>,
    /// Substring over title, description and item name
    pub search: Option<String>,
    pub submitted_by: Option<String>,
    /// Keep expired items when no status is requested
    pub include_expired: bool,
}

impl LostFoundFilter {
    fn condition(&self, now: DateTime<Utc>) -> Condition {
        use lost_found_item::Column;

        let mut cond = Condition::all();

        if let Some(item_type) = self.item_type {
            cond = cond.add(Column::ItemType.eq(item_type));
        }
        if let Some(category) = self.category {
            cond = cond.add(Column::Category.eq(category));
        }
        if let Some(submitted_by) = &self.submitted_by {
            cond = cond.add(Column::SubmittedBy.eq(submitted_by.as_str()));
        }

        cond = match self.status {
            Some(ItemStatus::Active) => cond
                .add(Column::Status.eq(ItemStatus::Active))
                .add(Column::ExpiryDate.gte(now)),
            Some(ItemStatus::Expired) => cond.add(expired(now)),
            Some(status) => cond.add(Column::Status.eq(status)),
            None if self.include_expired => cond,
            None => cond.add(expired(now).not()),
        };

        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            cond = cond.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Title))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(Column::Description))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(Column::ItemName))).like(&pattern)),
            );
        }

        cond
    }
}

/// Stored `expired`, or `active` past its expiry date.
fn expired(now: DateTime<Utc>) -> Condition {
    use lost_found_item::Column;

    Condition::any()
        .add(Column::Status.eq(ItemStatus::Expired))
        .add(
            Condition::all()
                .add(Column::Status.eq(ItemStatus::Active))
                .add(Column::ExpiryDate.lt(now)),
        )
}

/// Repository for lost-and-found items.
#[derive(Clone)]
pub struct LostFoundRepository {
    db: Arc<DatabaseConnection>,
}

impl LostFoundRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lost_found_item::Model>> {
        LostFoundItem::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an item by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<lost_found_item::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {id}")))
    }

    pub async fn create(
        &self,
        model: lost_found_item::ActiveModel,
    ) -> AppResult<lost_found_item::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update(
        &self,
        model: lost_found_item::ActiveModel,
    ) -> AppResult<lost_found_item::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an item. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = LostFoundItem::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Bump the view counter (single UPDATE, no fetch).
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        LostFoundItem::update_many()
            .col_expr(
                lost_found_item::Column::Views,
                Expr::col(lost_found_item::Column::Views).add(1),
            )
            .filter(lost_found_item::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Move an item from `active` to `claimed`, recording the claim.
    ///
    /// The update only matches a row that is still `active` and unexpired at
    /// `now`, so of two concurrent claims exactly one sees `true`.
    pub async fn try_claim(
        &self,
        id: &str,
        claimant_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        use lost_found_item::Column;

        let result = LostFoundItem::update_many()
            .col_expr(Column::Status, Expr::value(ItemStatus::Claimed))
            .col_expr(Column::ClaimedBy, Expr::value(Some(claimant_id.to_string())))
            .col_expr(Column::ClaimedAt, Expr::value(Some(now)))
            .col_expr(Column::VerificationCode, Expr::value(Some(code.to_string())))
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ItemStatus::Active))
            .filter(Column::ExpiryDate.gte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Move an item from `claimed` to `returned`. The claim record is kept.
    pub async fn try_mark_returned(&self, id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        use lost_found_item::Column;

        let result = LostFoundItem::update_many()
            .col_expr(Column::Status, Expr::value(ItemStatus::Returned))
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ItemStatus::Claimed))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// List items matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &LostFoundFilter,
        now: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<lost_found_item::Model>> {
        LostFoundItem::find()
            .filter(filter.condition(now))
            .order_by(lost_found_item::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count items matching `filter`.
    pub async fn count(&self, filter: &LostFoundFilter, now: DateTime<Utc>) -> AppResult<u64> {
        LostFoundItem::find()
            .filter(filter.condition(now))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_item(id: &str, status: ItemStatus) -> lost_found_item::Model {
        let now = Utc::now();
        lost_found_item::Model {
            id: id.to_string(),
            title: "Lost calculator".to_string(),
            description: "Casio fx-991 left in room 204".to_string(),
            item_type: ItemType::Lost,
            category: ItemCategory::Electronics,
            item_name: "Calculator".to_string(),
            brand: Some("Casio".to_string()),
            color: None,
            location: "Room 204".to_string(),
            date_time: now,
            contact_email: Some("owner@campus.edu".to_string()),
            contact_phone: None,
            submitted_by: "user1".to_string(),
            images: serde_json::json!([]),
            status,
            claimed_by: None,
            claimed_at: None,
            verification_code: None,
            is_reward: false,
            reward_amount: None,
            expiry_date: now + Duration::days(30),
            views: 0,
            created_at: now,
            updated_at: None,
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<lost_found_item::Model>::new()])
                .into_connection(),
        );

        let repo = LostFoundRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_try_claim_wins_once() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(1), exec_result(0)])
                .into_connection(),
        );

        let repo = LostFoundRepository::new(db);
        let now = Utc::now();

        assert!(repo.try_claim("item1", "user2", "ABC123", now).await.unwrap());
        assert!(!repo.try_claim("item1", "user3", "XYZ789", now).await.unwrap());
    }

    #[tokio::test]
    async fn test_try_mark_returned_requires_claimed_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(0)])
                .into_connection(),
        );

        let repo = LostFoundRepository::new(db);
        assert!(!repo.try_mark_returned("item1", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let item1 = create_test_item("item1", ItemStatus::Active);
        let item2 = create_test_item("item2", ItemStatus::Claimed);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[item1, item2]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = LostFoundRepository::new(db);
        let filter = LostFoundFilter {
            item_type: Some(ItemType::Lost),
            ..Default::default()
        };
        let now = Utc::now();

        let items = repo.list(&filter, now, 10, 0).await.unwrap();
        let total = repo.count(&filter, now).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_default_filter_hides_expired() {
        let sql = LostFoundItem::find()
            .filter(LostFoundFilter::default().condition(Utc::now()))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("NOT"));
        assert!(sql.contains("'expired'"));
    }

    #[test]
    fn test_search_matches_three_columns() {
        let filter = LostFoundFilter {
            search: Some("Casio".to_string()),
            include_expired: true,
            ..Default::default()
        };
        let sql = LostFoundItem::find()
            .filter(filter.condition(Utc::now()))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("LOWER(\"title\")"));
        assert!(sql.contains("LOWER(\"description\")"));
        assert!(sql.contains("LOWER(\"item_name\")"));
        assert!(sql.contains("'%casio%'"));
    }
}
