//! Announcement endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use campus_common::AppResult;
use campus_core::{
    CreateAnnouncementInput, LikeOutcome, ListAnnouncementsQuery, UpdateAnnouncementInput,
};
use campus_db::entities::announcement::{self, AnnouncementCategory, Audience, Priority};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, ValidatedJson, ValidatedQuery},
    middleware::AppState,
    response::ApiResponse,
};

/// Announcement response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub priority: Priority,
    pub target_audience: Audience,
    pub author: String,
    pub is_active: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes_count: usize,
    pub has_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AnnouncementResponse {
    pub fn for_viewer(announcement: announcement::Model, viewer_id: &str) -> Self {
        let likers = announcement.likers();
        Self {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            category: announcement.category,
            priority: announcement.priority,
            target_audience: announcement.target_audience,
            author: announcement.author_id,
            is_active: announcement.is_active,
            expiry_date: announcement.expiry_date,
            views: announcement.views,
            likes_count: likers.len(),
            has_liked: likers.iter().any(|id| id == viewer_id),
            created_at: announcement.created_at,
            updated_at: announcement.updated_at,
        }
    }
}

async fn list_announcements(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListAnnouncementsQuery>,
) -> AppResult<ApiResponse<Vec<AnnouncementResponse>>> {
    let page = state
        .announcement_service
        .list(&user.actor(), query)
        .await?;
    Ok(ApiResponse::paged(page, |a| {
        AnnouncementResponse::for_viewer(a, &user.0.id)
    }))
}

async fn create_announcement(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let created = state
        .announcement_service
        .create(&user.actor(), input)
        .await?;
    Ok(
        ApiResponse::created(AnnouncementResponse::for_viewer(created, &user.0.id))
            .with_message("Announcement created"),
    )
}

async fn get_announcement(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let found = state.announcement_service.get(&id).await?;
    Ok(ApiResponse::ok(AnnouncementResponse::for_viewer(found, &user.0.id)))
}

async fn update_announcement(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let updated = state
        .announcement_service
        .update(&id, &user.actor(), input)
        .await?;
    Ok(
        ApiResponse::ok(AnnouncementResponse::for_viewer(updated, &user.0.id))
            .with_message("Announcement updated"),
    )
}

async fn like_announcement(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeOutcome>> {
    let outcome = state.announcement_service.like(&id, &user.actor()).await?;
    let message = if outcome.liked {
        "Announcement liked"
    } else {
        "Announcement unliked"
    };
    Ok(ApiResponse::ok(outcome).with_message(message))
}

async fn delete_announcement(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .announcement_service
        .delete(&id, &user.actor())
        .await?;
    Ok(ApiResponse::message("Announcement deleted"))
}

/// Create announcement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route(
            "/{id}",
            get(get_announcement)
                .put(update_announcement)
                .delete(delete_announcement),
        )
        .route("/{id}/like", post(like_announcement))
}
