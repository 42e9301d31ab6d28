//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use aspen::{HookPhase, RequestContext, Website, WebsiteConfig};
use aspen_hooks::{HookError, RequestHook, request_fn};

/// Records the order hooks ran in.
#[derive(Clone, Default)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

impl Trail {
    /// Create an empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_string());
    }

    /// Entries recorded so far
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A request hook that records its name and succeeds
pub fn recording(name: &'static str, trail: &Trail) -> Arc<dyn RequestHook<RequestContext>> {
    let trail = trail.clone();
    request_fn(name, move |_request: &mut RequestContext| {
        trail.push(name);
        Ok(())
    })
}

/// A request hook that records its name and fails
pub fn failing(name: &'static str, trail: &Trail) -> Arc<dyn RequestHook<RequestContext>> {
    let trail = trail.clone();
    request_fn(name, move |_request: &mut RequestContext| {
        trail.push(name);
        Err(HookError::failed(name, "refused"))
    })
}

/// Names of the hooks registered for `phase`
pub fn names(website: &Website, phase: HookPhase) -> Vec<String> {
    website.hooks.names(phase)
}

/// A website built from defaults
pub fn website() -> Website {
    Website::new(WebsiteConfig::default()).expect("default website")
}
