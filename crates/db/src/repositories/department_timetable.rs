//! Department timetable repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::entities::{DepartmentTimetable, department_timetable};

/// Department timetable list filters. Only active timetables whose effective
/// window contains `now` match unless `include_all` is set.
#[derive(Debug, Clone, Default)]
pub struct DepartmentTimetableFilter {
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub include_all: bool,
}

impl DepartmentTimetableFilter {
    fn condition(&self, now: DateTime<Utc>) -> Condition {
        use department_timetable::Column;

        let mut cond = Condition::all();

        if !self.include_all {
            cond = cond.add(effective_at(now));
        }
        if let Some(department) = &self.department {
            cond = cond.add(Column::Department.eq(department.as_str()));
        }
        if let Some(year) = self.year {
            cond = cond.add(Column::Year.eq(year));
        }
        if let Some(semester) = self.semester {
            cond = cond.add(Column::Semester.eq(semester));
        }
        if let Some(section) = &self.section {
            cond = cond.add(Column::Section.eq(section.as_str()));
        }
        if let Some(academic_year) = &self.academic_year {
            cond = cond.add(Column::AcademicYear.eq(academic_year.as_str()));
        }

        cond
    }
}

fn effective_at(now: DateTime<Utc>) -> Condition {
    use department_timetable::Column;

    Condition::all()
        .add(Column::IsActive.eq(true))
        .add(Column::EffectiveFrom.lte(now))
        .add(Column::EffectiveTo.gte(now))
}

/// Unique-key collisions become `Conflict`; everything else is a database error.
fn map_write_err(err: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        AppError::Conflict("Timetable already exists for this class".to_string())
    } else {
        AppError::Database(err.to_string())
    }
}

#[derive(Debug, FromQueryResult)]
struct DepartmentName {
    department: String,
}

/// Repository for class-wide timetables.
#[derive(Clone)]
pub struct DepartmentTimetableRepository {
    db: Arc<DatabaseConnection>,
}

impl DepartmentTimetableRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<department_timetable::Model>> {
        DepartmentTimetable::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<department_timetable::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Timetable {id}")))
    }

    /// Find the timetable of one class in one academic year.
    pub async fn find_by_class(
        &self,
        department: &str,
        year: i32,
        semester: i32,
        section: &str,
        academic_year: &str,
    ) -> AppResult<Option<department_timetable::Model>> {
        use department_timetable::Column;

        DepartmentTimetable::find()
            .filter(Column::Department.eq(department))
            .filter(Column::Year.eq(year))
            .filter(Column::Semester.eq(semester))
            .filter(Column::Section.eq(section))
            .filter(Column::AcademicYear.eq(academic_year))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn create(
        &self,
        model: department_timetable::ActiveModel,
    ) -> AppResult<department_timetable::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    pub async fn update(
        &self,
        model: department_timetable::ActiveModel,
    ) -> AppResult<department_timetable::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = DepartmentTimetable::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// List timetables, newest first.
    pub async fn list(
        &self,
        filter: &DepartmentTimetableFilter,
        now: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<department_timetable::Model>> {
        DepartmentTimetable::find()
            .filter(filter.condition(now))
            .order_by(department_timetable::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn count(&self, filter: &DepartmentTimetableFilter, now: DateTime<Utc>) -> AppResult<u64> {
        DepartmentTimetable::find()
            .filter(filter.condition(now))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The newest timetable in effect at `now` for a department and year.
    pub async fn find_current(
        &self,
        department: &str,
        year: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<department_timetable::Model>> {
        use department_timetable::Column;

        DepartmentTimetable::find()
            .filter(effective_at(now))
            .filter(Column::Department.eq(department))
            .filter(Column::Year.eq(year))
            .order_by(Column::CreatedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct departments that have a timetable, alphabetically.
    pub async fn departments(&self) -> AppResult<Vec<String>> {
        let rows = DepartmentTimetable::find()
            .select_only()
            .column(department_timetable::Column::Department)
            .distinct()
            .order_by(department_timetable::Column::Department, Order::Asc)
            .into_model::<DepartmentName>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|row| row.department).collect())
    }
}
