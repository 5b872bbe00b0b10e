//! Lost-and-found endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use campus_common::AppResult;
use campus_core::{CreateItemInput, ListItemsQuery, UpdateItemInput};
use campus_db::entities::lost_found_item::{self, ItemCategory, ItemImage, ItemStatus, ItemType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, ValidatedJson, ValidatedQuery},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Serialize)]
pub struct ContactInfoResponse {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Item as seen by one viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub category: ItemCategory,
    pub item_name: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub contact_info: ContactInfoResponse,
    pub submitted_by: String,
    pub images: Vec<ItemImage>,
    pub status: ItemStatus,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    /// Only present for the claimant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    pub is_reward: bool,
    pub reward_amount: Option<f64>,
    pub expiry_date: DateTime<Utc>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ItemResponse {
    /// Render `item` for `viewer_id`, applying lazy expiry.
    pub fn for_viewer(item: lost_found_item::Model, viewer_id: &str) -> Self {
        let status = item.effective_status(Utc::now());
        let images = item.image_list();
        let is_claimant = item.claimed_by.as_deref() == Some(viewer_id);

        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            item_type: item.item_type,
            category: item.category,
            item_name: item.item_name,
            brand: item.brand,
            color: item.color,
            location: item.location,
            date_time: item.date_time,
            contact_info: ContactInfoResponse {
                email: item.contact_email,
                phone: item.contact_phone,
            },
            submitted_by: item.submitted_by,
            images,
            status,
            claimed_by: item.claimed_by,
            claimed_at: item.claimed_at,
            verification_code: item.verification_code.filter(|_| is_claimant),
            is_reward: item.is_reward,
            reward_amount: item.reward_amount,
            expiry_date: item.expiry_date,
            views: item.views,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyRequest {
    pub verification_code: String,
}

async fn list_items(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListItemsQuery>,
) -> AppResult<ApiResponse<Vec<ItemResponse>>> {
    let page = state.lost_found_service.list(&user.actor(), query).await?;
    Ok(ApiResponse::paged(page, |item| {
        ItemResponse::for_viewer(item, &user.0.id)
    }))
}

async fn create_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateItemInput>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let item = state.lost_found_service.create(&user, input).await?;
    Ok(ApiResponse::created(ItemResponse::for_viewer(item, &user.id))
        .with_message("Item reported"))
}

async fn get_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let item = state.lost_found_service.get(&id).await?;
    Ok(ApiResponse::ok(ItemResponse::for_viewer(item, &user.id)))
}

async fn update_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateItemInput>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let item = state
        .lost_found_service
        .update(&id, &user.actor(), input)
        .await?;
    Ok(ApiResponse::ok(ItemResponse::for_viewer(item, &user.0.id)).with_message("Item updated"))
}

async fn delete_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.lost_found_service.delete(&id, &user.actor()).await?;
    Ok(ApiResponse::message("Item deleted"))
}

async fn claim_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let outcome = state.lost_found_service.claim(&id, &user.actor()).await?;
    let mut response = ItemResponse::for_viewer(outcome.item, &user.0.id);
    response.verification_code = Some(outcome.verification_code);
    Ok(ApiResponse::ok(response)
        .with_message("Item claimed. Share the verification code with the submitter."))
}

async fn verify_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<VerifyRequest>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let item = state
        .lost_found_service
        .verify(&id, &user.actor(), &req.verification_code)
        .await?;
    Ok(ApiResponse::ok(ItemResponse::for_viewer(item, &user.0.id))
        .with_message("Item marked as returned"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/{id}/claim", post(claim_item))
        .route("/{id}/verify", post(verify_item))
}
