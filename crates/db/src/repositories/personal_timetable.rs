//! Personal timetable repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, prelude::Json,
    sea_query::OnConflict,
};

use crate::entities::{PersonalTimetable, personal_timetable};

/// Repository for per-user weekly schedules.
#[derive(Clone)]
pub struct PersonalTimetableRepository {
    db: Arc<DatabaseConnection>,
}

impl PersonalTimetableRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the timetable owned by `user_id`.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Option<personal_timetable::Model>> {
        PersonalTimetable::find()
            .filter(personal_timetable::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert or fully replace the schedule of `user_id` in one statement.
    ///
    /// `id` is only used when no row exists yet.
    pub async fn upsert(
        &self,
        id: String,
        user_id: &str,
        schedule: Json,
        now: DateTime<Utc>,
    ) -> AppResult<personal_timetable::Model> {
        let model = personal_timetable::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            schedule: Set(schedule),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        PersonalTimetable::insert(model)
            .on_conflict(
                OnConflict::column(personal_timetable::Column::UserId)
                    .update_columns([
                        personal_timetable::Column::Schedule,
                        personal_timetable::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the timetable of `user_id`. Returns whether a row was removed.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<bool> {
        let result = PersonalTimetable::delete_many()
            .filter(personal_timetable::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
