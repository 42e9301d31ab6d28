//! # aspen-core
//!
//! Core crate for the Aspen website object. Contains the typed
//! configuration schema with its documented defaults, the values derived
//! from it at startup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Aspen crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::WebsiteConfig;
pub use error::AppError;
pub use result::AppResult;
