//! # aspen-hooks
//!
//! Hook system for the Aspen website object. Provides:
//!
//! - The six fixed [`HookPhase`]s, in lifecycle order
//! - [`Hook`], an ordered sequence that only grows through `register`
//!   or `insert`
//! - [`HookRegistry`], one `Hook` per phase as named fields
//! - [`HookDispatcher`], which runs a phase with the right failure semantics

pub mod definitions;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod hook;
pub mod registry;

pub use definitions::{HookPhase, PhaseKind, RequestContext};
pub use dispatcher::{HookDispatcher, ShutdownFailure};
pub use error::{HookError, HookResult};
pub use handler::{LifecycleHook, RequestHook, lifecycle_fn, request_fn};
pub use hook::{Hook, Named};
pub use registry::{HookRegistry, LifecycleHooks, RequestHooks};
