//! Blanket "come back later" policy installed when `unavailable > 0`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use http::{HeaderMap, StatusCode};

use aspen_core::config::http_date;
use aspen_hooks::{HookError, HookResult, RequestHook};

/// Name the hook registers under.
pub const UNAVAILABLE_HOOK: &str = "unavailable";

/// Answers every request with `503 Service Unavailable`.
#[derive(Debug, Clone)]
pub struct UnavailableHook {
    minutes: u32,
    retry_after: DateTime<Utc>,
    content_type: String,
}

impl UnavailableHook {
    /// Creates the hook for an outage of `minutes` ending at `retry_after`.
    /// The plain-text body is labelled with `content_type`.
    pub fn new(minutes: u32, retry_after: DateTime<Utc>, content_type: impl Into<String>) -> Self {
        Self {
            minutes,
            retry_after,
            content_type: content_type.into(),
        }
    }

    /// When clients are told to come back.
    pub fn retry_after(&self) -> DateTime<Utc> {
        self.retry_after
    }

    fn response(&self) -> HookError {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&http_date(self.retry_after)) {
            headers.insert(RETRY_AFTER, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        let plural = if self.minutes == 1 { "" } else { "s" };
        HookError::Respond {
            status: StatusCode::SERVICE_UNAVAILABLE,
            headers,
            body: format!(
                "Service unavailable for about {} minute{plural}. Please try again later.",
                self.minutes
            ),
        }
    }
}

#[async_trait]
impl<R: Send + Sync> RequestHook<R> for UnavailableHook {
    fn name(&self) -> &str {
        UNAVAILABLE_HOOK
    }

    async fn run(&self, _request: &mut R) -> HookResult<()> {
        Err(self.response())
    }
}
