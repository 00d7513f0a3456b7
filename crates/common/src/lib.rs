//! Common utilities and shared types for clanhub.
//!
//! This crate provides foundational components used across all clanhub crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`],
//!   with the stable string-code taxonomy surfaced to callers
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Telemetry**: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use clanhub_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod telemetry;

pub use config::{Config, DatabaseConfig};
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, validate_id};
pub use telemetry::init_tracing;
