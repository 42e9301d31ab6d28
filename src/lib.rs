//! # aspen
//!
//! The process-wide website object: resolved [`WebsiteConfig`], the hook
//! registry, and the startup-time state derived from them.

pub mod cli;
pub mod logging;
pub mod unavailable;
pub mod website;

pub use aspen_core::config::WebsiteConfig;
pub use aspen_core::{AppError, AppResult};
pub use aspen_hooks::{HookPhase, HookRegistry, RequestContext};
pub use unavailable::UnavailableHook;
pub use website::Website;
