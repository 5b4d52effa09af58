//! Shared types, errors, and configuration for filterlink.
//!
//! This crate provides common types used across all other crates:
//! - Typed identifiers for dashboards and native filters
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{DashboardId, FilterId};
