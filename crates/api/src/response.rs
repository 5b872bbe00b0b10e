//! API response envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use campus_core::{Paged, Pagination};
use serde::Serialize;

/// `{success, data?, message?, pagination?}`. Errors are rendered by
/// `AppError` in the same shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with data.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    /// 201 with the created record.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    /// Attach a human readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A page of records mapped through `f`.
    pub fn paged<U>(page: Paged<U>, f: impl FnMut(U) -> T) -> Self {
        Self {
            pagination: Some(page.pagination),
            ..Self::ok(page.items.into_iter().map(f).collect())
        }
    }
}

impl ApiResponse<()> {
    /// 200 with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
