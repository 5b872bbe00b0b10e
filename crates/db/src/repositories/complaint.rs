//! Complaint repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use super::{like_pattern, toggle_member};
use crate::entities::{
    Complaint, ComplaintComment,
    complaint::{self, ComplaintCategory, ComplaintStatus, Priority},
    complaint_comment,
};

/// Complaint list filters.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub category: Option<ComplaintCategory>,
    pub status: Option<ComplaintStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub submitted_by: Option<String>,
}

impl ComplaintFilter {
    fn condition(&self) -> Condition {
        use complaint::Column;

        let mut cond = Condition::all();

        if let Some(category) = self.category {
            cond = cond.add(Column::Category.eq(category));
        }
        if let Some(status) = self.status {
            cond = cond.add(Column::Status.eq(status));
        }
        if let Some(priority) = self.priority {
            cond = cond.add(Column::Priority.eq(priority));
        }
        if let Some(submitted_by) = &self.submitted_by {
            cond = cond.add(Column::SubmittedBy.eq(submitted_by.as_str()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            cond = cond.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Title))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(Column::Description))).like(&pattern)),
            );
        }

        cond
    }
}

/// Row of the per-status breakdown.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct StatusCount {
    pub status: ComplaintStatus,
    pub count: i64,
}

/// Repository for complaints.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<complaint::Model>> {
        Complaint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {id}")))
    }

    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Complaint::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Add or remove `user_id` from the upvoters in one statement, so concurrent
    /// toggles by different users all land. `None` when the complaint is gone.
    pub async fn toggle_upvoter(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<complaint::Model>> {
        let mut updated = Complaint::update_many()
            .col_expr(
                complaint::Column::UpvoterIds,
                toggle_member(complaint::Column::UpvoterIds, user_id),
            )
            .filter(complaint::Column::Id.eq(id))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(updated.pop())
    }

    /// Append a comment to a complaint thread.
    pub async fn add_comment(
        &self,
        model: complaint_comment::ActiveModel,
    ) -> AppResult<complaint_comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments of a complaint, oldest first.
    pub async fn comments(&self, complaint_id: &str) -> AppResult<Vec<complaint_comment::Model>> {
        ComplaintComment::find()
            .filter(complaint_comment::Column::ComplaintId.eq(complaint_id))
            .order_by(complaint_comment::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List complaints, newest first.
    pub async fn list(
        &self,
        filter: &ComplaintFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        Complaint::find()
            .filter(filter.condition())
            .order_by(complaint::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn count(&self, filter: &ComplaintFilter) -> AppResult<u64> {
        Complaint::find()
            .filter(filter.condition())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of complaints per status. Statuses with no rows are absent.
    pub async fn count_by_status(&self) -> AppResult<Vec<StatusCount>> {
        Complaint::find()
            .select_only()
            .column(complaint::Column::Status)
            .column_as(Expr::col(complaint::Column::Id).count(), "count")
            .group_by(complaint::Column::Status)
            .into_model::<StatusCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_complaint(id: &str, submitted_by: &str) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            title: "Broken fan".to_string(),
            description: "Ceiling fan in room 12 does not turn on".to_string(),
            category: ComplaintCategory::Hostel,
            priority: Priority::Medium,
            status: ComplaintStatus::Pending,
            submitted_by: submitted_by.to_string(),
            location: Some("Block A".to_string()),
            is_anonymous: false,
            admin_response: None,
            responded_by: None,
            responded_at: None,
            upvoter_ids: serde_json::json!([]),
            resolved_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_by_submitter() {
        let c1 = create_test_complaint("c1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let filter = ComplaintFilter {
            submitted_by: Some("user1".to_string()),
            ..Default::default()
        };
        let results = repo.list(&filter, 10, 0).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].submitted_by, "user1");
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    maplit::btreemap! {
                        "status" => Value::String(Some(Box::new("pending".to_string()))),
                        "count" => Value::BigInt(Some(3)),
                    },
                    maplit::btreemap! {
                        "status" => Value::String(Some(Box::new("in-progress".to_string()))),
                        "count" => Value::BigInt(Some(1)),
                    },
                ]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let counts = repo.count_by_status().await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].status, ComplaintStatus::Pending);
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[1].status, ComplaintStatus::InProgress);
    }

    #[tokio::test]
    async fn test_toggle_upvoter_is_single_conditional_update() {
        let mut after = create_test_complaint("c1", "user1");
        after.upvoter_ids = serde_json::json!(["user2"]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[after]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(Arc::clone(&db));
        let updated = repo.toggle_upvoter("c1", "user2").await.unwrap().unwrap();
        assert_eq!(updated.upvoters(), vec!["user2".to_string()]);

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{log:?}");
        assert!(sql.contains("UPDATE"));
        assert!(sql.contains("CASE WHEN"));
        assert!(sql.contains("jsonb_build_array"));
        assert!(sql.contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_toggle_upvoter_on_missing_complaint() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<complaint::Model>::new()])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        assert!(repo.toggle_upvoter("gone", "user2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comments_are_read_oldest_first() {
        let comment = complaint_comment::Model {
            id: "cm1".to_string(),
            complaint_id: "c1".to_string(),
            user_id: "user1".to_string(),
            message: "Still broken".to_string(),
            created_at: Utc::now(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(Arc::clone(&db));
        let comments = repo.comments("c1").await.unwrap();
        assert_eq!(comments[0].message, "Still broken");

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("ORDER BY \"complaint_comment\".\"created_at\" ASC"));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<complaint::Model>::new()])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        assert!(matches!(
            repo.get_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
