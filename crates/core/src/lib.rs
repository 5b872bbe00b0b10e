//! Core business logic for campus-rs.

pub mod pagination;
pub mod services;

pub use pagination::{PageRequest, Paged, Pagination};
pub use services::*;
