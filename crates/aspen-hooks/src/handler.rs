//! Hook handler traits and closure adapters.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use aspen_core::config::WebsiteConfig;

use crate::error::HookResult;
use crate::hook::Named;

/// A hook run once per process, in the `startup` or `shutdown` phase.
#[async_trait]
pub trait LifecycleHook: Send + Sync + fmt::Debug {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs the hook against the resolved website configuration.
    async fn run(&self, config: &WebsiteConfig) -> HookResult<()>;
}

/// A hook run once per request in an `inbound_*` or `outbound_*` phase.
#[async_trait]
pub trait RequestHook<R>: Send + Sync + fmt::Debug
where
    R: Send + Sync,
{
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs the hook against the in-flight request.
    async fn run(&self, request: &mut R) -> HookResult<()>;
}

impl Named for dyn LifecycleHook {
    fn hook_name(&self) -> &str {
        self.name()
    }
}

impl<R: Send + Sync + 'static> Named for dyn RequestHook<R> {
    fn hook_name(&self) -> &str {
        self.name()
    }
}

/// Lifecycle hook backed by a synchronous closure.
pub struct FnLifecycleHook<F> {
    name: String,
    f: F,
}

impl<F> fmt::Debug for FnLifecycleHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLifecycleHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> LifecycleHook for FnLifecycleHook<F>
where
    F: Fn(&WebsiteConfig) -> HookResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, config: &WebsiteConfig) -> HookResult<()> {
        (self.f)(config)
    }
}

/// Request hook backed by a synchronous closure.
pub struct FnRequestHook<F> {
    name: String,
    f: F,
}

impl<F> fmt::Debug for FnRequestHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRequestHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R, F> RequestHook<R> for FnRequestHook<F>
where
    R: Send + Sync,
    F: Fn(&mut R) -> HookResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, request: &mut R) -> HookResult<()> {
        (self.f)(request)
    }
}

/// Wraps a closure as a shareable lifecycle hook.
pub fn lifecycle_fn<F>(name: &str, f: F) -> Arc<dyn LifecycleHook>
where
    F: Fn(&WebsiteConfig) -> HookResult<()> + Send + Sync + 'static,
{
    Arc::new(FnLifecycleHook {
        name: name.to_string(),
        f,
    })
}

/// Wraps a closure as a shareable request hook.
pub fn request_fn<R, F>(name: &str, f: F) -> Arc<dyn RequestHook<R>>
where
    R: Send + Sync + 'static,
    F: Fn(&mut R) -> HookResult<()> + Send + Sync + 'static,
{
    Arc::new(FnRequestHook {
        name: name.to_string(),
        f,
    })
}
