//! Department timetable endpoints. Admins write; students read their own class.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use campus_common::AppResult;
use campus_core::{
    CreateDepartmentTimetableInput, ListDepartmentTimetablesQuery, UpdateDepartmentTimetableInput,
};
use campus_db::entities::department_timetable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    extractors::{AuthUser, ValidatedJson, ValidatedQuery},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTimetableResponse {
    pub id: String,
    pub department: String,
    pub year: i32,
    pub semester: i32,
    pub section: String,
    pub academic_year: String,
    pub schedule: Value,
    pub effective_from: DateTime<Utc>,
    pub effective_to: DateTime<Utc>,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<department_timetable::Model> for DepartmentTimetableResponse {
    fn from(timetable: department_timetable::Model) -> Self {
        Self {
            id: timetable.id,
            department: timetable.department,
            year: timetable.year,
            semester: timetable.semester,
            section: timetable.section,
            academic_year: timetable.academic_year,
            schedule: timetable.schedule,
            effective_from: timetable.effective_from,
            effective_to: timetable.effective_to,
            created_by: timetable.created_by,
            is_active: timetable.is_active,
            created_at: timetable.created_at,
            updated_at: timetable.updated_at,
        }
    }
}

async fn list_timetables(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListDepartmentTimetablesQuery>,
) -> AppResult<ApiResponse<Vec<DepartmentTimetableResponse>>> {
    let page = state.department_timetable_service.list(&user, query).await?;
    Ok(ApiResponse::paged(page, DepartmentTimetableResponse::from))
}

async fn create_timetable(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateDepartmentTimetableInput>,
) -> AppResult<ApiResponse<DepartmentTimetableResponse>> {
    let created = state
        .department_timetable_service
        .create(&user.actor(), input)
        .await?;
    Ok(ApiResponse::created(created.into()).with_message("Timetable created successfully"))
}

async fn get_timetable(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DepartmentTimetableResponse>> {
    let found = state.department_timetable_service.get(&id, &user).await?;
    Ok(ApiResponse::ok(found.into()))
}

async fn update_timetable(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateDepartmentTimetableInput>,
) -> AppResult<ApiResponse<DepartmentTimetableResponse>> {
    let updated = state
        .department_timetable_service
        .update(&id, &user.actor(), input)
        .await?;
    Ok(ApiResponse::ok(updated.into()).with_message("Timetable updated successfully"))
}

async fn delete_timetable(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .department_timetable_service
        .delete(&id, &user.actor())
        .await?;
    Ok(ApiResponse::message("Timetable deleted successfully"))
}

async fn my_current(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DepartmentTimetableResponse>> {
    let current = state.department_timetable_service.my_current(&user).await?;
    Ok(ApiResponse::ok(current.into()))
}

async fn list_departments(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let departments = state
        .department_timetable_service
        .departments(&user.actor())
        .await?;
    Ok(ApiResponse::ok(departments))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_timetables).post(create_timetable))
        .route("/my/current", get(my_current))
        .route("/departments/list", get(list_departments))
        .route(
            "/{id}",
            get(get_timetable)
                .put(update_timetable)
                .delete(delete_timetable),
        )
}
