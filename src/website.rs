//! The website object: configuration plus hooks, passed explicitly.
//!
//! One [`Website`] is built at process start, handed to configuration
//! functions while it is still mutable, then frozen (typically behind an
//! `Arc`) for request handling. Dropping it after [`Website::stop`] ends
//! its lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use aspen_core::config::WebsiteConfig;
use aspen_core::result::AppResult;
use aspen_hooks::{
    HookDispatcher, HookPhase, HookRegistry, HookResult, RequestContext, ShutdownFailure,
};

use crate::unavailable::UnavailableHook;

/// Configuration and hooks for one website.
#[derive(Debug)]
pub struct Website<R: Send + Sync + 'static = RequestContext> {
    /// Resolved configuration.
    pub config: WebsiteConfig,
    /// Hooks by phase.
    pub hooks: HookRegistry<R>,
    retry_after: Option<DateTime<Utc>>,
}

impl<R: Send + Sync + 'static> Website<R> {
    /// Builds a website from `config`, deriving startup state from the
    /// current time.
    pub fn new(config: WebsiteConfig) -> AppResult<Self> {
        Self::new_at(config, Utc::now())
    }

    /// Builds a website as if started at `now`.
    ///
    /// When `config.unavailable` is positive, an [`UnavailableHook`] is
    /// registered first in `inbound_early`.
    pub fn new_at(config: WebsiteConfig, now: DateTime<Utc>) -> AppResult<Self> {
        config.validate()?;
        if config.show_tracebacks && config.mode.is_stprod() {
            warn!(mode = %config.mode, "Tracebacks are shown to clients");
        }

        let mut hooks = HookRegistry::new();
        let retry_after = config.retry_after(now);
        if let Some(retry_after) = retry_after {
            warn!(
                minutes = config.unavailable,
                retry_after = %retry_after,
                "Website marked unavailable"
            );
            hooks.register_request(
                HookPhase::InboundEarly,
                Arc::new(UnavailableHook::new(
                    config.unavailable,
                    retry_after,
                    config.content_type_dynamic(&config.media_type_default),
                )),
            )?;
        }

        Ok(Self {
            config,
            hooks,
            retry_after,
        })
    }

    /// When an unavailable website expects to be back.
    pub fn retry_after(&self) -> Option<DateTime<Utc>> {
        self.retry_after
    }

    /// Runs a configuration function against the still-mutable website.
    pub fn configure<F>(&mut self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut Self) -> AppResult<()>,
    {
        f(self)
    }

    /// Returns a dispatcher over this website's hooks.
    pub fn dispatcher(&self) -> HookDispatcher<'_, R> {
        HookDispatcher::new(&self.hooks)
    }

    /// Runs the `startup` phase. An error means initialisation must stop.
    pub async fn start(&self) -> AppResult<()> {
        self.dispatcher().startup(&self.config).await?;
        info!(
            address = %self.config.network_address,
            engine = %self.config.network_engine,
            mode = %self.config.mode,
            "Website started"
        );
        Ok(())
    }

    /// Runs both inbound phases for `request`.
    pub async fn handle_inbound(&self, request: &mut R) -> HookResult<()> {
        self.dispatcher().inbound(request).await
    }

    /// Runs both outbound phases for `request`.
    pub async fn handle_outbound(&self, request: &mut R) -> HookResult<()> {
        self.dispatcher().outbound(request).await
    }

    /// Runs the `shutdown` phase and returns the hooks that failed.
    pub async fn stop(&self) -> Vec<ShutdownFailure> {
        let failures = self.dispatcher().shutdown(&self.config).await;
        info!(failed = failures.len(), "Website stopped");
        failures
    }
}
