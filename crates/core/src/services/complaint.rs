//! Complaint service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::complaint::{self, ComplaintCategory, ComplaintStatus, Priority};
use campus_db::entities::complaint_comment;
use campus_db::repositories::{ComplaintFilter, ComplaintRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::access::{Actor, can_view_complaint, require_admin, require_owner_or_admin};
use crate::pagination::{PageRequest, Paged};

/// Input for filing a complaint.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateComplaintInput {
    #[validate(length(min = 1, max = 100, message = "Title is required (max 100 chars)"))]
    pub title: String,

    #[validate(length(min = 1, max = 1000, message = "Description is required (max 1000 chars)"))]
    pub description: String,

    pub category: ComplaintCategory,

    #[serde(default)]
    pub priority: Priority,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,
}

/// Admin status change with an optional response.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStatusInput {
    pub status: ComplaintStatus,

    #[validate(length(min = 1, max = 500, message = "Response must be 1-500 chars"))]
    pub admin_response: Option<String>,
}

/// A comment on a complaint thread.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddCommentInput {
    #[validate(length(min = 1, max = 500, message = "Comment is required (max 500 chars)"))]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComplaintsQuery {
    pub category: Option<ComplaintCategory>,
    pub status: Option<ComplaintStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    #[serde(default)]
    pub mine: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Upvote toggle result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteOutcome {
    pub upvoted: bool,
    pub upvotes: usize,
}

/// Totals per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
}

/// Service for student complaints.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    id_gen: IdGenerator,
}

impl ComplaintService {
    #[must_use]
    pub const fn new(complaint_repo: ComplaintRepository) -> Self {
        Self {
            complaint_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a complaint. Always starts `pending`.
    pub async fn create(
        &self,
        submitter: &Actor,
        input: CreateComplaintInput,
    ) -> AppResult<complaint::Model> {
        input.validate()?;

        let model = complaint::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            category: Set(input.category),
            priority: Set(input.priority),
            status: Set(ComplaintStatus::Pending),
            submitted_by: Set(submitter.id.clone()),
            location: Set(input
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())),
            is_anonymous: Set(input.is_anonymous),
            admin_response: Set(None),
            responded_by: Set(None),
            responded_at: Set(None),
            upvoter_ids: Set(serde_json::json!([])),
            resolved_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.complaint_repo.create(model).await?;
        info!(user_id = %submitter.id, complaint_id = %created.id, "Complaint created");
        Ok(created)
    }

    /// Fetch a complaint the caller may see.
    pub async fn get(&self, id: &str, caller: &Actor) -> AppResult<complaint::Model> {
        let found = self.complaint_repo.get_by_id(id).await?;
        if !can_view_complaint(caller, &found) {
            return Err(AppError::Forbidden("Not authorized to view this complaint".to_string()));
        }
        Ok(found)
    }

    /// Students list their own complaints; admins list all, or their own with `mine`.
    pub async fn list(
        &self,
        caller: &Actor,
        query: ListComplaintsQuery,
    ) -> AppResult<Paged<complaint::Model>> {
        let page = PageRequest::new(query.page, query.limit)?;
        let submitted_by = (!caller.is_admin() || query.mine).then(|| caller.id.clone());
        let filter = ComplaintFilter {
            category: query.category,
            status: query.status,
            priority: query.priority,
            search: query.search,
            submitted_by,
        };

        let items = self
            .complaint_repo
            .list(&filter, page.limit, page.offset())
            .await?;
        let total = self.complaint_repo.count(&filter).await?;

        Ok(Paged {
            items,
            pagination: page.summarize(total),
        })
    }

    /// Move a complaint along `pending -> in-progress -> resolved|rejected`.
    ///
    /// Re-submitting the current status is accepted only to attach a response.
    pub async fn update_status(
        &self,
        id: &str,
        admin: &Actor,
        input: UpdateStatusInput,
    ) -> AppResult<complaint::Model> {
        require_admin(admin, "update complaint status")?;
        input.validate()?;

        let existing = self.complaint_repo.get_by_id(id).await?;
        let from = existing.status;
        let to = input.status;
        let response = input
            .admin_response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let same_status_reply = from == to && response.is_some();
        if !same_status_reply && !from.can_transition_to(to) {
            return Err(AppError::InvalidState(format!(
                "Cannot change status from {} to {}",
                status_name(from),
                status_name(to)
            )));
        }

        let now = Utc::now();
        let mut active: complaint::ActiveModel = existing.into();
        active.status = Set(to);
        if to == ComplaintStatus::Resolved && from != to {
            active.resolved_at = Set(Some(now));
        }
        if let Some(response) = response {
            active.admin_response = Set(Some(response));
            active.responded_by = Set(Some(admin.id.clone()));
            active.responded_at = Set(Some(now));
        }
        active.updated_at = Set(Some(now));

        let updated = self.complaint_repo.update(active).await?;
        info!(
            user_id = %admin.id,
            complaint_id = %id,
            from = status_name(from),
            to = status_name(to),
            "Complaint status updated"
        );
        Ok(updated)
    }

    /// Toggle the caller's upvote. The toggle itself is a single statement.
    pub async fn upvote(&self, id: &str, caller: &Actor) -> AppResult<UpvoteOutcome> {
        self.get(id, caller).await?;

        let updated = self
            .complaint_repo
            .toggle_upvoter(id, &caller.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {id}")))?;
        let upvoters = updated.upvoters();
        let upvoted = upvoters.contains(&caller.id);
        let upvotes = upvoters.len();

        info!(user_id = %caller.id, complaint_id = %id, upvoted, "Complaint upvote toggled");
        Ok(UpvoteOutcome { upvoted, upvotes })
    }

    /// Add a comment. Anyone who can see the complaint may comment on it.
    pub async fn add_comment(
        &self,
        id: &str,
        caller: &Actor,
        input: AddCommentInput,
    ) -> AppResult<complaint_comment::Model> {
        input.validate()?;
        let message = input.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::Validation("Comment is required (max 500 chars)".to_string()));
        }
        self.get(id, caller).await?;

        let comment = self
            .complaint_repo
            .add_comment(complaint_comment::ActiveModel {
                id: Set(self.id_gen.generate()),
                complaint_id: Set(id.to_string()),
                user_id: Set(caller.id.clone()),
                message: Set(message),
                created_at: Set(Utc::now()),
            })
            .await?;

        info!(user_id = %caller.id, complaint_id = %id, comment_id = %comment.id, "Complaint comment added");
        Ok(comment)
    }

    /// Comment thread of a complaint the caller may see, oldest first.
    pub async fn comments(
        &self,
        id: &str,
        caller: &Actor,
    ) -> AppResult<Vec<complaint_comment::Model>> {
        self.get(id, caller).await?;
        self.complaint_repo.comments(id).await
    }

    /// Delete a complaint (owner or admin).
    pub async fn delete(&self, id: &str, caller: &Actor) -> AppResult<()> {
        let found = self.complaint_repo.get_by_id(id).await?;
        require_owner_or_admin(caller, &found.submitted_by, "delete this complaint")?;

        self.complaint_repo.delete(id).await?;
        info!(user_id = %caller.id, complaint_id = %id, "Complaint deleted");
        Ok(())
    }

    /// Per-status totals (admin only).
    pub async fn stats(&self, caller: &Actor) -> AppResult<ComplaintStats> {
        require_admin(caller, "view complaint statistics")?;

        let mut stats = ComplaintStats::default();
        for row in self.complaint_repo.count_by_status().await? {
            stats.total += row.count;
            match row.status {
                ComplaintStatus::Pending => stats.pending = row.count,
                ComplaintStatus::InProgress => stats.in_progress = row.count,
                ComplaintStatus::Resolved => stats.resolved = row.count,
                ComplaintStatus::Rejected => stats.rejected = row.count,
            }
        }
        Ok(stats)
    }
}

const fn status_name(status: ComplaintStatus) -> &'static str {
    match status {
        ComplaintStatus::Pending => "pending",
        ComplaintStatus::InProgress => "in-progress",
        ComplaintStatus::Resolved => "resolved",
        ComplaintStatus::Rejected => "rejected",
    }
}
