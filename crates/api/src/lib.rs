//! HTTP API layer for campus-rs.
//!
//! - **Endpoints**: auth, lost-and-found, personal timetable, announcements, complaints
//! - **Extractors**: bearer authentication and JSON bodies that fail inside the envelope
//! - **Middleware**: token resolution
//!
//! Built on Axum 0.8. Every response uses the
//! `{success, data?, message?, errors?, pagination?}` envelope.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{app, router};
pub use middleware::{AppState, auth_middleware};
