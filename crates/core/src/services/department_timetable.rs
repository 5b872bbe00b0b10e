//! Department-wide timetables: admin-published class schedules that students
//! read for their own department and year.

use std::{borrow::Cow, sync::LazyLock};

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::{department_timetable, user},
    repositories::{DepartmentTimetableFilter, DepartmentTimetableRepository},
};
use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use super::access::{Actor, can_view_department_timetable, require_admin};
use super::timetable::{Weekday, parse_time};
use crate::pagination::{PageRequest, Paged};

static ACADEMIC_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d{4}-\d{4}$").unwrap()
});

const MAX_PERIOD: u8 = 8;

fn validate_academic_year(value: &str) -> Result<(), ValidationError> {
    if ACADEMIC_YEAR_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("academic_year")
            .with_message(Cow::Borrowed("Academic year format should be YYYY-YYYY")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    #[default]
    Lecture,
    Lab,
    Tutorial,
    Seminar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Subject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Faculty {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One numbered slot of a class day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Period {
    pub period_number: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub faculty: Faculty,
    #[serde(default)]
    pub room: String,
    #[serde(default, rename = "type")]
    pub kind: PeriodKind,
    #[serde(default)]
    pub is_break: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DaySchedule {
    pub day: Weekday,
    #[serde(default)]
    pub periods: Vec<Period>,
}

fn required(value: &mut String, day: Weekday, number: u8, field: &str, max: usize) -> AppResult<()> {
    *value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!(
            "{day}: period {number} is missing {field}"
        )));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{day}: period {number} {field} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

fn check_period(period: &mut Period, day: Weekday) -> AppResult<()> {
    let number = period.period_number;
    if !(1..=MAX_PERIOD).contains(&number) {
        return Err(AppError::Validation(format!(
            "{day}: period number {number} must be between 1 and {MAX_PERIOD}"
        )));
    }

    period.start_time = period.start_time.trim().to_string();
    period.end_time = period.end_time.trim().to_string();
    let (Some(start), Some(end)) = (parse_time(&period.start_time), parse_time(&period.end_time))
    else {
        return Err(AppError::Validation(format!(
            "{day}: period {number} has an invalid time (expected HH:MM)"
        )));
    };
    if start >= end {
        return Err(AppError::Validation(format!(
            "{day}: period {number} must end after it starts"
        )));
    }

    if period.is_break {
        return Ok(());
    }

    required(&mut period.subject.code, day, number, "subject code", 20)?;
    period.subject.code = period.subject.code.to_uppercase();
    required(&mut period.subject.name, day, number, "subject name", 100)?;
    if let Some(credits) = period.subject.credits
        && !(1..=6).contains(&credits)
    {
        return Err(AppError::Validation(format!(
            "{day}: period {number} credits must be between 1 and 6"
        )));
    }
    required(&mut period.faculty.name, day, number, "faculty name", 100)?;
    required(&mut period.room, day, number, "room", 50)?;
    Ok(())
}

/// Check a week and put it in day and period order.
///
/// Days may appear once; period numbers once per day. Breaks need only
/// their number and times.
pub fn normalize_schedule(mut days: Vec<DaySchedule>) -> AppResult<Vec<DaySchedule>> {
    if days.is_empty() {
        return Err(AppError::Validation("Schedule is required".to_string()));
    }

    days.sort_by_key(|d| d.day);
    for pair in days.windows(2) {
        if pair[0].day == pair[1].day {
            return Err(AppError::Validation(format!(
                "{} appears more than once",
                pair[0].day
            )));
        }
    }

    for day in &mut days {
        for period in &mut day.periods {
            check_period(period, day.day)?;
        }
        day.periods.sort_by_key(|p| p.period_number);
        for pair in day.periods.windows(2) {
            if pair[0].period_number == pair[1].period_number {
                return Err(AppError::Validation(format!(
                    "{}: period {} appears more than once",
                    day.day, pair[0].period_number
                )));
            }
        }
    }

    Ok(days)
}

fn encode(days: &[DaySchedule]) -> AppResult<serde_json::Value> {
    serde_json::to_value(days)
        .map_err(|e| AppError::Internal(format!("Failed to encode timetable: {e}")))
}

/// Input for publishing a class timetable.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDepartmentTimetableInput {
    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,

    #[validate(range(min = 1, max = 4, message = "Year must be between 1-4"))]
    pub year: i32,

    #[validate(range(min = 1, max = 8, message = "Semester must be between 1-8"))]
    pub semester: i32,

    #[validate(length(min = 1, max = 16, message = "Section is required"))]
    pub section: String,

    #[validate(custom(function = "validate_academic_year"))]
    pub academic_year: String,

    pub effective_from: DateTime<Utc>,

    pub effective_to: DateTime<Utc>,

    pub schedule: Vec<DaySchedule>,
}

/// Partial update. A new schedule replaces the stored one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDepartmentTimetableInput {
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,

    #[validate(range(min = 1, max = 4))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 8))]
    pub semester: Option<i32>,

    #[validate(length(min = 1, max = 16))]
    pub section: Option<String>,

    #[validate(custom(function = "validate_academic_year"))]
    pub academic_year: Option<String>,

    pub effective_from: Option<DateTime<Utc>>,

    pub effective_to: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,

    pub schedule: Option<Vec<DaySchedule>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDepartmentTimetablesQuery {
    pub department: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    /// Admins only: include inactive and out-of-window timetables
    #[serde(default)]
    pub all: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn check_window(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<()> {
    if from < to {
        Ok(())
    } else {
        Err(AppError::Validation(
            "effectiveTo must be after effectiveFrom".to_string(),
        ))
    }
}

/// Service for department timetables.
#[derive(Clone)]
pub struct DepartmentTimetableService {
    timetable_repo: DepartmentTimetableRepository,
    id_gen: IdGenerator,
}

impl DepartmentTimetableService {
    #[must_use]
    pub const fn new(timetable_repo: DepartmentTimetableRepository) -> Self {
        Self {
            timetable_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn ensure_class_free(
        &self,
        department: &str,
        year: i32,
        semester: i32,
        section: &str,
        academic_year: &str,
        except_id: Option<&str>,
    ) -> AppResult<()> {
        let existing = self
            .timetable_repo
            .find_by_class(department, year, semester, section, academic_year)
            .await?;
        match existing {
            Some(found) if Some(found.id.as_str()) != except_id => Err(AppError::Conflict(
                "Timetable already exists for this class".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Publish a timetable (admin only).
    pub async fn create(
        &self,
        admin: &Actor,
        input: CreateDepartmentTimetableInput,
    ) -> AppResult<department_timetable::Model> {
        require_admin(admin, "publish timetables")?;
        input.validate()?;
        check_window(input.effective_from, input.effective_to)?;
        let schedule = normalize_schedule(input.schedule)?;

        let department = input.department.trim().to_string();
        let section = input.section.trim().to_uppercase();
        let academic_year = input.academic_year.trim().to_string();
        self.ensure_class_free(
            &department,
            input.year,
            input.semester,
            &section,
            &academic_year,
            None,
        )
        .await?;

        let model = department_timetable::ActiveModel {
            id: Set(self.id_gen.generate()),
            department: Set(department),
            year: Set(input.year),
            semester: Set(input.semester),
            section: Set(section),
            academic_year: Set(academic_year),
            schedule: Set(encode(&schedule)?),
            effective_from: Set(input.effective_from),
            effective_to: Set(input.effective_to),
            created_by: Set(admin.id.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.timetable_repo.create(model).await?;
        info!(
            user_id = %admin.id,
            timetable_id = %created.id,
            department = %created.department,
            year = created.year,
            "Department timetable created"
        );
        Ok(created)
    }

    /// Update a timetable (admin only).
    pub async fn update(
        &self,
        id: &str,
        admin: &Actor,
        input: UpdateDepartmentTimetableInput,
    ) -> AppResult<department_timetable::Model> {
        require_admin(admin, "edit timetables")?;
        input.validate()?;

        let existing = self.timetable_repo.get_by_id(id).await?;
        check_window(
            input.effective_from.unwrap_or(existing.effective_from),
            input.effective_to.unwrap_or(existing.effective_to),
        )?;

        let department = input
            .department
            .map_or_else(|| existing.department.clone(), |d| d.trim().to_string());
        let year = input.year.unwrap_or(existing.year);
        let semester = input.semester.unwrap_or(existing.semester);
        let section = input
            .section
            .map_or_else(|| existing.section.clone(), |s| s.trim().to_uppercase());
        let academic_year = input
            .academic_year
            .map_or_else(|| existing.academic_year.clone(), |a| a.trim().to_string());

        let key_changed = department != existing.department
            || year != existing.year
            || semester != existing.semester
            || section != existing.section
            || academic_year != existing.academic_year;
        if key_changed {
            self.ensure_class_free(&department, year, semester, &section, &academic_year, Some(id))
                .await?;
        }

        let mut active: department_timetable::ActiveModel = existing.into();
        active.department = Set(department);
        active.year = Set(year);
        active.semester = Set(semester);
        active.section = Set(section);
        active.academic_year = Set(academic_year);
        if let Some(from) = input.effective_from {
            active.effective_from = Set(from);
        }
        if let Some(to) = input.effective_to {
            active.effective_to = Set(to);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(schedule) = input.schedule {
            active.schedule = Set(encode(&normalize_schedule(schedule)?)?);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = self.timetable_repo.update(active).await?;
        info!(user_id = %admin.id, timetable_id = %id, "Department timetable updated");
        Ok(updated)
    }

    /// Delete a timetable (admin only).
    pub async fn delete(&self, id: &str, admin: &Actor) -> AppResult<()> {
        require_admin(admin, "delete timetables")?;
        self.timetable_repo.get_by_id(id).await?;
        self.timetable_repo.delete(id).await?;
        info!(user_id = %admin.id, timetable_id = %id, "Department timetable deleted");
        Ok(())
    }

    /// One timetable, if the caller's class may see it.
    pub async fn get(
        &self,
        id: &str,
        caller: &user::Model,
    ) -> AppResult<department_timetable::Model> {
        let found = self.timetable_repo.get_by_id(id).await?;
        if !can_view_department_timetable(caller, &found) {
            return Err(AppError::Forbidden(
                "Not authorized to view this timetable".to_string(),
            ));
        }
        Ok(found)
    }

    /// Timetables in effect now. Students are pinned to their own department
    /// and year; admins filter freely and may ask for every timetable.
    pub async fn list(
        &self,
        caller: &user::Model,
        query: ListDepartmentTimetablesQuery,
    ) -> AppResult<Paged<department_timetable::Model>> {
        let page = PageRequest::new(query.page, query.limit)?;

        let (department, year) = if caller.is_admin() {
            (query.department, query.year)
        } else {
            match (&caller.department, caller.year) {
                (Some(department), Some(year)) => (Some(department.clone()), Some(year)),
                _ => {
                    return Ok(Paged {
                        items: Vec::new(),
                        pagination: page.summarize(0),
                    });
                }
            }
        };
        let filter = DepartmentTimetableFilter {
            department,
            year,
            semester: query.semester,
            section: query.section.map(|s| s.trim().to_uppercase()),
            academic_year: query.academic_year,
            include_all: query.all && caller.is_admin(),
        };
        let now = Utc::now();

        let items = self
            .timetable_repo
            .list(&filter, now, page.limit, page.offset())
            .await?;
        let total = self.timetable_repo.count(&filter, now).await?;

        Ok(Paged {
            items,
            pagination: page.summarize(total),
        })
    }

    /// The timetable currently in effect for a student's class.
    pub async fn my_current(&self, caller: &user::Model) -> AppResult<department_timetable::Model> {
        if caller.is_admin() {
            return Err(AppError::Forbidden(
                "Only students have a class timetable".to_string(),
            ));
        }
        let (Some(department), Some(year)) = (caller.department.as_deref(), caller.year) else {
            return Err(AppError::Validation(
                "Department and year are not set on your profile".to_string(),
            ));
        };

        self.timetable_repo
            .find_current(department, year, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Active timetable for your class".to_string()))
    }

    /// Departments that have at least one timetable (admin only).
    pub async fn departments(&self, admin: &Actor) -> AppResult<Vec<String>> {
        require_admin(admin, "list departments")?;
        self.timetable_repo.departments().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::access::Role;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn period(number: u8, start: &str, end: &str) -> Period {
        Period {
            period_number: number,
            start_time: start.to_string(),
            end_time: end.to_string(),
            subject: Subject {
                code: "cs201".to_string(),
                name: "Data Structures".to_string(),
                credits: Some(4),
            },
            faculty: Faculty {
                name: "Dr. Rao".to_string(),
                email: None,
                phone: None,
            },
            room: "LH-2".to_string(),
            kind: PeriodKind::Lecture,
            is_break: false,
        }
    }

    fn stored(id: &str, department: &str, year: i32) -> department_timetable::Model {
        let now = Utc::now();
        department_timetable::Model {
            id: id.to_string(),
            department: department.to_string(),
            year,
            semester: 3,
            section: "A".to_string(),
            academic_year: "2025-2026".to_string(),
            schedule: json!([]),
            effective_from: now - Duration::days(10),
            effective_to: now + Duration::days(100),
            created_by: "admin1".to_string(),
            is_active: true,
            created_at: now,
            updated_at: None,
        }
    }

    fn member(role: Role, department: Option<&str>, year: Option<i32>) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: "u1@campus.edu".to_string(),
            password_hash: String::new(),
            name: "U1".to_string(),
            role,
            phone: None,
            student_id: None,
            department: department.map(ToString::to_string),
            year,
            token: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn input() -> CreateDepartmentTimetableInput {
        let now = Utc::now();
        CreateDepartmentTimetableInput {
            department: " CSE ".to_string(),
            year: 2,
            semester: 3,
            section: "a".to_string(),
            academic_year: "2025-2026".to_string(),
            effective_from: now,
            effective_to: now + Duration::days(120),
            schedule: vec![DaySchedule {
                day: Weekday::Monday,
                periods: vec![period(1, "09:00", "10:00")],
            }],
        }
    }

    fn service(db: MockDatabase) -> DepartmentTimetableService {
        DepartmentTimetableService::new(DepartmentTimetableRepository::new(Arc::new(
            db.into_connection(),
        )))
    }

    #[test]
    fn test_normalize_orders_days_and_periods() {
        let days = vec![
            DaySchedule {
                day: Weekday::Wednesday,
                periods: vec![period(2, "10:00", "11:00"), period(1, "9:00", "10:00")],
            },
            DaySchedule {
                day: Weekday::Monday,
                periods: vec![],
            },
        ];

        let days = normalize_schedule(days).unwrap();
        assert_eq!(days[0].day, Weekday::Monday);
        assert_eq!(days[1].periods[0].period_number, 1);
        assert_eq!(days[1].periods[0].subject.code, "CS201");
    }

    #[test]
    fn test_normalize_rejects_bad_periods() {
        let cases = [
            (period(9, "09:00", "10:00"), "between 1 and 8"),
            (period(1, "10:00", "09:00"), "must end after"),
            (period(1, "9am", "10:00"), "invalid time"),
        ];
        for (bad, expected) in cases {
            let result = normalize_schedule(vec![DaySchedule {
                day: Weekday::Friday,
                periods: vec![bad],
            }]);
            let Err(AppError::Validation(msg)) = result else {
                panic!("expected validation error");
            };
            assert!(msg.starts_with("Friday"), "{msg}");
            assert!(msg.contains(expected), "{msg}");
        }
    }

    #[test]
    fn test_break_needs_no_subject() {
        let mut lunch = period(4, "12:00", "13:00");
        lunch.is_break = true;
        lunch.subject = Subject::default();
        lunch.faculty = Faculty::default();
        lunch.room = String::new();

        assert!(normalize_schedule(vec![DaySchedule {
            day: Weekday::Monday,
            periods: vec![lunch],
        }])
        .is_ok());
    }

    #[test]
    fn test_duplicate_day_is_rejected() {
        let day = DaySchedule {
            day: Weekday::Tuesday,
            periods: vec![],
        };
        let result = normalize_schedule(vec![day.clone(), day]);
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("Tuesday")));
    }

    #[test]
    fn test_lowercase_day_names_are_accepted() {
        let day: DaySchedule = serde_json::from_value(json!({"day": "monday"})).unwrap();
        assert_eq!(day.day, Weekday::Monday);
        assert!(serde_json::from_value::<DaySchedule>(json!({"day": "sunday"})).is_err());
    }

    #[test]
    fn test_academic_year_format() {
        let mut bad = input();
        bad.academic_year = "2025-26".to_string();
        assert!(bad.validate().is_err());
        assert!(input().validate().is_ok());
    }

    #[tokio::test]
    async fn test_student_cannot_publish() {
        let result = service(MockDatabase::new(DatabaseBackend::Postgres))
            .create(&Actor::new("s1", Role::Student), input())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_publishes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<department_timetable::Model>::new()])
            .append_query_results([[stored("dt1", "CSE", 2)]]);

        let created = service(db)
            .create(&Actor::new("admin1", Role::Admin), input())
            .await
            .unwrap();
        assert_eq!(created.id, "dt1");
    }

    #[tokio::test]
    async fn test_duplicate_class_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored("dt1", "CSE", 2)]]);

        let result = service(db)
            .create(&Actor::new("admin1", Role::Admin), input())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_inverted_window_is_rejected() {
        let mut bad = input();
        bad.effective_to = bad.effective_from - Duration::days(1);

        let result = service(MockDatabase::new(DatabaseBackend::Postgres))
            .create(&Actor::new("admin1", Role::Admin), bad)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_student_cannot_view_other_year() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored("dt1", "CSE", 3)]]);

        let result = service(db)
            .get("dt1", &member(Role::Student, Some("CSE"), Some(2)))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_student_list_is_pinned_to_own_class() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored("dt1", "CSE", 2)]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(1))
            }]]);
        let service = service(db);

        let query = ListDepartmentTimetablesQuery {
            department: Some("ECE".to_string()),
            year: Some(4),
            all: true,
            ..Default::default()
        };
        let page = service
            .list(&member(Role::Student, Some("CSE"), Some(2)), query)
            .await
            .unwrap();
        assert_eq!(page.items[0].department, "CSE");
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_student_without_class_sees_nothing() {
        let page = service(MockDatabase::new(DatabaseBackend::Postgres))
            .list(
                &member(Role::Student, None, None),
                ListDepartmentTimetablesQuery::default(),
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_my_current_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<department_timetable::Model>::new()]);

        let result = service(db)
            .my_current(&member(Role::Student, Some("CSE"), Some(2)))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_my_current_is_for_students() {
        let result = service(MockDatabase::new(DatabaseBackend::Postgres))
            .my_current(&member(Role::Admin, Some("CSE"), Some(2)))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_to_taken_class_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored("dt1", "CSE", 2)]])
            .append_query_results([[stored("dt2", "CSE", 3)]]);

        let input = UpdateDepartmentTimetableInput {
            year: Some(3),
            ..Default::default()
        };
        let result = service(db)
            .update("dt1", &Actor::new("admin1", Role::Admin), input)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_admin_deletes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored("dt1", "CSE", 2)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);

        service(db)
            .delete("dt1", &Actor::new("admin1", Role::Admin))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_departments_admin_only() {
        let result = service(MockDatabase::new(DatabaseBackend::Postgres))
            .departments(&Actor::new("s1", Role::Student))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
