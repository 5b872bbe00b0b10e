//! Complaint endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use campus_common::AppResult;
use campus_core::{
    AddCommentInput, ComplaintStats, CreateComplaintInput, ListComplaintsQuery, UpdateStatusInput,
    UpvoteOutcome,
};
use campus_db::entities::complaint::{self, ComplaintCategory, ComplaintStatus, Priority};
use campus_db::entities::complaint_comment;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, ValidatedJson, ValidatedQuery},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub message: String,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Complaint as seen by one viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: Priority,
    pub status: ComplaintStatus,
    /// Hidden from everyone but the submitter when anonymous
    pub submitted_by: Option<String>,
    pub location: Option<String>,
    pub is_anonymous: bool,
    pub admin_response: Option<AdminResponse>,
    pub upvotes: usize,
    pub has_upvoted: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ComplaintResponse {
    pub fn for_viewer(complaint: complaint::Model, viewer_id: &str) -> Self {
        let upvoters = complaint.upvoters();
        let is_owner = complaint.submitted_by == viewer_id;
        let submitted_by =
            (is_owner || !complaint.is_anonymous).then_some(complaint.submitted_by);
        let admin_response = complaint.admin_response.map(|message| AdminResponse {
            message,
            responded_by: complaint.responded_by,
            responded_at: complaint.responded_at,
        });

        Self {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            priority: complaint.priority,
            status: complaint.status,
            submitted_by,
            location: complaint.location,
            is_anonymous: complaint.is_anonymous,
            admin_response,
            upvotes: upvoters.len(),
            has_upvoted: upvoters.iter().any(|id| id == viewer_id),
            resolved_at: complaint.resolved_at,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub complaint_id: String,
    pub user: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<complaint_comment::Model> for CommentResponse {
    fn from(comment: complaint_comment::Model) -> Self {
        Self {
            id: comment.id,
            complaint_id: comment.complaint_id,
            user: comment.user_id,
            message: comment.message,
            created_at: comment.created_at,
        }
    }
}

async fn list_complaints(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListComplaintsQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let page = state.complaint_service.list(&user.actor(), query).await?;
    Ok(ApiResponse::paged(page, |c| {
        ComplaintResponse::for_viewer(c, &user.0.id)
    }))
}

async fn create_complaint(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateComplaintInput>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let created = state
        .complaint_service
        .create(&user.actor(), input)
        .await?;
    Ok(
        ApiResponse::created(ComplaintResponse::for_viewer(created, &user.0.id))
            .with_message("Complaint submitted"),
    )
}

async fn get_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ComplaintStats>> {
    let stats = state.complaint_service.stats(&user.actor()).await?;
    Ok(ApiResponse::ok(stats))
}

async fn get_complaint(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let found = state.complaint_service.get(&id, &user.actor()).await?;
    Ok(ApiResponse::ok(ComplaintResponse::for_viewer(found, &user.0.id)))
}

async fn update_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateStatusInput>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let updated = state
        .complaint_service
        .update_status(&id, &user.actor(), input)
        .await?;
    Ok(
        ApiResponse::ok(ComplaintResponse::for_viewer(updated, &user.0.id))
            .with_message("Complaint status updated"),
    )
}

async fn upvote(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UpvoteOutcome>> {
    let outcome = state.complaint_service.upvote(&id, &user.actor()).await?;
    let message = if outcome.upvoted {
        "Upvote added"
    } else {
        "Upvote removed"
    };
    Ok(ApiResponse::ok(outcome).with_message(message))
}

async fn add_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<AddCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .complaint_service
        .add_comment(&id, &user.actor(), input)
        .await?;
    Ok(ApiResponse::created(comment.into()).with_message("Comment added successfully"))
}

async fn list_comments(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let thread = state.complaint_service.comments(&id, &user.actor()).await?;
    Ok(ApiResponse::ok(thread.into_iter().map(Into::into).collect()))
}

async fn delete_complaint(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.complaint_service.delete(&id, &user.actor()).await?;
    Ok(ApiResponse::message("Complaint deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_complaints).post(create_complaint))
        .route("/stats/overview", get(get_stats))
        .route("/{id}", get(get_complaint).delete(delete_complaint))
        .route("/{id}/status", put(update_status))
        .route("/{id}/upvote", post(upvote))
        .route("/{id}/comments", get(list_comments).post(add_comment))
}
