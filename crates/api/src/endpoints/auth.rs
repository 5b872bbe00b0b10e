//! Authentication endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use campus_common::AppResult;
use campus_core::{LoginInput, RegisterInput};
use campus_db::entities::user::{self, UserRole};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Public profile of an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            student_id: user.student_id,
            department: user.department,
            year: user.year,
            created_at: user.created_at,
        }
    }
}

/// Token plus the account it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<user::Model> for AuthResponse {
    fn from(mut user: user::Model) -> Self {
        Self {
            token: user.token.take().unwrap_or_default(),
            user: user.into(),
        }
    }
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = state.user_service.register(input).await?;
    Ok(ApiResponse::created(user.into()).with_message("Registration successful"))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(user.into()).with_message("Login successful"))
}

async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.logout(&user.0.id).await?;
    Ok(ApiResponse::message("Logged out"))
}

async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
