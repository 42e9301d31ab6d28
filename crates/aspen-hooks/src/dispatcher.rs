//! Hook dispatcher — runs a phase's hooks in registration order.
//!
//! - `startup`: the first failure aborts and is returned; initialisation
//!   must not continue.
//! - `inbound_*` / `outbound_*`: the first failure stops the phase and is
//!   returned; the pipeline turns it into the error response.
//! - `shutdown`: every hook runs. Failures are logged and collected.

use tracing::{debug, error, warn};

use aspen_core::config::WebsiteConfig;

use crate::definitions::HookPhase;
use crate::error::{HookError, HookResult};
use crate::registry::HookRegistry;

/// A shutdown hook that failed.
#[derive(Debug)]
pub struct ShutdownFailure {
    /// Name of the hook.
    pub hook: String,
    /// The error it returned.
    pub error: HookError,
}

/// Runs hooks from a borrowed registry.
#[derive(Debug)]
pub struct HookDispatcher<'a, R: Send + Sync + 'static> {
    registry: &'a HookRegistry<R>,
}

impl<'a, R: Send + Sync + 'static> HookDispatcher<'a, R> {
    /// Creates a dispatcher over `registry`.
    pub fn new(registry: &'a HookRegistry<R>) -> Self {
        Self { registry }
    }

    /// Runs the `startup` hooks, stopping at the first failure.
    pub async fn startup(&self, config: &WebsiteConfig) -> HookResult<()> {
        debug!(
            hook_count = self.registry.startup.len(),
            "Running startup hooks"
        );

        for hook in &self.registry.startup {
            if let Err(e) = hook.run(config).await {
                error!(hook = %hook.name(), error = %e, "Startup hook failed");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Runs the hooks of a request phase, stopping at the first failure.
    pub async fn run_request(&self, phase: HookPhase, request: &mut R) -> HookResult<()> {
        let hooks = self.registry.request(phase)?;
        if hooks.is_empty() {
            return Ok(());
        }

        debug!(phase = %phase, hook_count = hooks.len(), "Dispatching request hooks");

        for hook in hooks {
            if let Err(e) = hook.run(request).await {
                match &e {
                    HookError::Respond { status, .. } => {
                        debug!(phase = %phase, hook = %hook.name(), status = %status, "Hook answered request");
                    }
                    _ => {
                        warn!(phase = %phase, hook = %hook.name(), error = %e, "Request hook failed");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Runs `inbound_early` then `inbound_late`.
    pub async fn inbound(&self, request: &mut R) -> HookResult<()> {
        self.run_request(HookPhase::InboundEarly, request).await?;
        self.run_request(HookPhase::InboundLate, request).await
    }

    /// Runs `outbound_early` then `outbound_late`.
    pub async fn outbound(&self, request: &mut R) -> HookResult<()> {
        self.run_request(HookPhase::OutboundEarly, request).await?;
        self.run_request(HookPhase::OutboundLate, request).await
    }

    /// Runs every `shutdown` hook, collecting failures instead of stopping.
    pub async fn shutdown(&self, config: &WebsiteConfig) -> Vec<ShutdownFailure> {
        debug!(
            hook_count = self.registry.shutdown.len(),
            "Running shutdown hooks"
        );

        let mut failures = Vec::new();
        for hook in &self.registry.shutdown {
            if let Err(e) = hook.run(config).await {
                error!(hook = %hook.name(), error = %e, "Shutdown hook failed, continuing");
                failures.push(ShutdownFailure {
                    hook: hook.name().to_string(),
                    error: e,
                });
            }
        }
        failures
    }
}
