//! Personal timetable endpoints. Every route acts on the caller's own week.

use axum::{Router, extract::State, routing::get};
use campus_common::AppResult;
use campus_core::{GridLayout, Schedule};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceTimetableRequest {
    pub schedule: Schedule,
}

async fn get_timetable(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Schedule>> {
    let schedule = state.timetable_service.get(&user.id).await?;
    Ok(ApiResponse::ok(schedule))
}

async fn replace_timetable(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ReplaceTimetableRequest>,
) -> AppResult<ApiResponse<Schedule>> {
    let schedule = state
        .timetable_service
        .replace(&user.id, req.schedule)
        .await?;
    Ok(ApiResponse::ok(schedule).with_message("Timetable updated successfully"))
}

async fn delete_timetable(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.timetable_service.delete(&user.id).await?;
    Ok(ApiResponse::message("Timetable deleted successfully"))
}

async fn get_layout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<GridLayout>> {
    let layout = state.timetable_service.layout(&user.id).await?;
    Ok(ApiResponse::ok(layout))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_timetable)
                .put(replace_timetable)
                .delete(delete_timetable),
        )
        .route("/layout", get(get_layout))
}
