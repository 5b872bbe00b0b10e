//! API endpoints.

mod announcements;
mod auth;
mod complaints;
mod health;
mod lost_found;
mod personal_timetable;
mod timetable;

use axum::{Router, middleware::from_fn_with_state};

use campus_common::AppError;

use crate::middleware::{AppState, auth_middleware};

pub use announcements::AnnouncementResponse;
pub use auth::{AuthResponse, UserResponse};
pub use complaints::ComplaintResponse;
pub use lost_found::ItemResponse;
pub use timetable::DepartmentTimetableResponse;

/// Create the API router. Mounted under `/api` by the server.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/lost-found", lost_found::router())
        .nest("/personal-timetable", personal_timetable::router())
        .nest("/timetable", timetable::router())
        .nest("/announcements", announcements::router())
        .nest("/complaints", complaints::router())
        .nest("/health", health::router())
}

/// The full application: [`router`] under `/api` behind bearer-token resolution.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .fallback(route_not_found)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route".to_string())
}
