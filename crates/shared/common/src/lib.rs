//! Common utilities shared by the service crates.
//!
//! This crate provides:
//! - HTTP error mapping for domain errors
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
