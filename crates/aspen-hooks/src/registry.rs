//! Hook registry — one ordered [`Hook`] per phase.
//!
//! The registry is a plain struct with a field per phase rather than a map,
//! so only the six phases can exist. Name-based access parses the name
//! into a [`HookPhase`] first and fails on anything else.
//!
//! There is no internal locking: registration needs `&mut self` and
//! happens before serving starts; request handling only reads.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::definitions::{HookPhase, PhaseKind, RequestContext};
use crate::error::{HookError, HookResult};
use crate::handler::{LifecycleHook, RequestHook};
use crate::hook::Hook;

/// Hooks run once per process.
pub type LifecycleHooks = Hook<dyn LifecycleHook>;

/// Hooks run once per request.
pub type RequestHooks<R> = Hook<dyn RequestHook<R>>;

/// All hooks of a website, grouped by phase.
pub struct HookRegistry<R: Send + Sync + 'static = RequestContext> {
    /// Run once before serving starts.
    pub startup: LifecycleHooks,
    /// Run first for every inbound request.
    pub inbound_early: RequestHooks<R>,
    /// Run right before the resource handles the request.
    pub inbound_late: RequestHooks<R>,
    /// Run right after the resource produced a response.
    pub outbound_early: RequestHooks<R>,
    /// Run last before the response leaves.
    pub outbound_late: RequestHooks<R>,
    /// Run once after serving stops.
    pub shutdown: LifecycleHooks,
}

impl<R: Send + Sync + 'static> HookRegistry<R> {
    /// Creates a registry with every phase empty.
    pub fn new() -> Self {
        Self {
            startup: Hook::new(),
            inbound_early: Hook::new(),
            inbound_late: Hook::new(),
            outbound_early: Hook::new(),
            outbound_late: Hook::new(),
            shutdown: Hook::new(),
        }
    }

    /// Returns the hooks of a lifecycle phase.
    pub fn lifecycle(&self, phase: HookPhase) -> HookResult<&LifecycleHooks> {
        match phase {
            HookPhase::Startup => Ok(&self.startup),
            HookPhase::Shutdown => Ok(&self.shutdown),
            _ => Err(wrong_kind(phase, PhaseKind::Lifecycle)),
        }
    }

    /// Returns the hooks of a lifecycle phase for mutation.
    pub fn lifecycle_mut(&mut self, phase: HookPhase) -> HookResult<&mut LifecycleHooks> {
        match phase {
            HookPhase::Startup => Ok(&mut self.startup),
            HookPhase::Shutdown => Ok(&mut self.shutdown),
            _ => Err(wrong_kind(phase, PhaseKind::Lifecycle)),
        }
    }

    /// Returns the hooks of a request phase.
    pub fn request(&self, phase: HookPhase) -> HookResult<&RequestHooks<R>> {
        match phase {
            HookPhase::InboundEarly => Ok(&self.inbound_early),
            HookPhase::InboundLate => Ok(&self.inbound_late),
            HookPhase::OutboundEarly => Ok(&self.outbound_early),
            HookPhase::OutboundLate => Ok(&self.outbound_late),
            _ => Err(wrong_kind(phase, PhaseKind::Request)),
        }
    }

    /// Returns the hooks of a request phase for mutation.
    pub fn request_mut(&mut self, phase: HookPhase) -> HookResult<&mut RequestHooks<R>> {
        match phase {
            HookPhase::InboundEarly => Ok(&mut self.inbound_early),
            HookPhase::InboundLate => Ok(&mut self.inbound_late),
            HookPhase::OutboundEarly => Ok(&mut self.outbound_early),
            HookPhase::OutboundLate => Ok(&mut self.outbound_late),
            _ => Err(wrong_kind(phase, PhaseKind::Request)),
        }
    }

    /// Appends a hook to a lifecycle phase.
    pub fn register_lifecycle(
        &mut self,
        phase: HookPhase,
        hook: Arc<dyn LifecycleHook>,
    ) -> HookResult<()> {
        let name = hook.name().to_string();
        self.lifecycle_mut(phase)?.register(hook);
        info!(phase = %phase, hook = %name, "Hook registered");
        Ok(())
    }

    /// Appends a hook to a request phase.
    pub fn register_request(
        &mut self,
        phase: HookPhase,
        hook: Arc<dyn RequestHook<R>>,
    ) -> HookResult<()> {
        let name = hook.name().to_string();
        self.request_mut(phase)?.register(hook);
        info!(phase = %phase, hook = %name, "Hook registered");
        Ok(())
    }

    /// Returns the number of hooks in `phase`.
    pub fn len(&self, phase: HookPhase) -> usize {
        match phase {
            HookPhase::Startup => self.startup.len(),
            HookPhase::InboundEarly => self.inbound_early.len(),
            HookPhase::InboundLate => self.inbound_late.len(),
            HookPhase::OutboundEarly => self.outbound_early.len(),
            HookPhase::OutboundLate => self.outbound_late.len(),
            HookPhase::Shutdown => self.shutdown.len(),
        }
    }

    /// Returns the number of hooks in the phase called `name`.
    pub fn len_of(&self, name: &str) -> HookResult<usize> {
        Ok(self.len(name.parse()?))
    }

    /// Returns the hook names of `phase`, in order.
    pub fn names(&self, phase: HookPhase) -> Vec<String> {
        match phase {
            HookPhase::Startup => self.startup.names(),
            HookPhase::InboundEarly => self.inbound_early.names(),
            HookPhase::InboundLate => self.inbound_late.names(),
            HookPhase::OutboundEarly => self.outbound_early.names(),
            HookPhase::OutboundLate => self.outbound_late.names(),
            HookPhase::Shutdown => self.shutdown.names(),
        }
    }

    /// Returns the hook names of the phase called `name`.
    pub fn names_of(&self, name: &str) -> HookResult<Vec<String>> {
        Ok(self.names(name.parse()?))
    }

    /// Every phase with its hook names, in lifecycle order.
    pub fn summary(&self) -> Vec<(HookPhase, Vec<String>)> {
        HookPhase::ALL
            .into_iter()
            .map(|phase| (phase, self.names(phase)))
            .collect()
    }

    /// Returns whether no phase holds any hook.
    pub fn is_empty(&self) -> bool {
        HookPhase::ALL.into_iter().all(|phase| self.len(phase) == 0)
    }
}

impl<R: Send + Sync + 'static> Default for HookRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + Sync + 'static> fmt::Debug for HookRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("startup", &self.startup)
            .field("inbound_early", &self.inbound_early)
            .field("inbound_late", &self.inbound_late)
            .field("outbound_early", &self.outbound_early)
            .field("outbound_late", &self.outbound_late)
            .field("shutdown", &self.shutdown)
            .finish()
    }
}

fn wrong_kind(phase: HookPhase, expected: PhaseKind) -> HookError {
    HookError::PhaseKind { phase, expected }
}
