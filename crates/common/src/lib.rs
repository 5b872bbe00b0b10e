//! Common utilities and shared types for campus-rs.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID record IDs and bearer tokens via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use campus_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("{} -> {id}", config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult, FieldError};
pub use id::IdGenerator;
