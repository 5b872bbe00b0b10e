//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use campus_core::{
    AnnouncementService, ComplaintService, DepartmentTimetableService, LostFoundService,
    TimetableService, UserService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub lost_found_service: LostFoundService,
    pub timetable_service: TimetableService,
    pub department_timetable_service: DepartmentTimetableService,
    pub announcement_service: AnnouncementService,
    pub complaint_service: ComplaintService,
}

/// Resolve `Authorization: Bearer <token>` into the request's user.
///
/// Unknown tokens leave the request anonymous; endpoints that need a user
/// reject it through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
