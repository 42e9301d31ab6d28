//! Integration tests for the website lifecycle and derived state.

mod helpers;

use chrono::{Duration, TimeZone, Utc};
use http::StatusCode;
use http::header::{CONTENT_TYPE, RETRY_AFTER};

use aspen::unavailable::UNAVAILABLE_HOOK;
use aspen::{HookPhase, RequestContext, Website, WebsiteConfig};
use aspen_core::error::ErrorKind;
use aspen_hooks::{HookError, lifecycle_fn};

use helpers::{Trail, recording};

#[tokio::test]
async fn test_unavailable_website_answers_503() {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let config = WebsiteConfig {
        unavailable: 5,
        charset_dynamic: "ISO-8859-1".to_string(),
        ..Default::default()
    };
    let mut website: Website = Website::new_at(config, now).unwrap();
    assert_eq!(website.retry_after(), Some(now + Duration::minutes(5)));

    let trail = Trail::new();
    website
        .configure(|w| {
            w.hooks
                .register_request(HookPhase::InboundEarly, recording("auth", &trail))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(
        helpers::names(&website, HookPhase::InboundEarly),
        vec![UNAVAILABLE_HOOK, "auth"]
    );

    let mut request = RequestContext::new("GET", "/");
    let err = website.handle_inbound(&mut request).await.unwrap_err();

    match err {
        HookError::Respond {
            status, headers, ..
        } => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(
                headers.get(RETRY_AFTER).unwrap(),
                "Wed, 15 Jan 2025 09:05:00 GMT"
            );
            assert_eq!(
                headers.get(CONTENT_TYPE).unwrap(),
                "text/plain; charset=ISO-8859-1"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(trail.entries().is_empty());
}

#[tokio::test]
async fn test_available_website_registers_nothing() {
    let website = helpers::website();
    assert!(website.hooks.is_empty());

    let mut request = RequestContext::new("GET", "/");
    website.handle_inbound(&mut request).await.unwrap();
    website.handle_outbound(&mut request).await.unwrap();
}

#[tokio::test]
async fn test_startup_failure_aborts_start() {
    let mut website = helpers::website();
    website
        .hooks
        .register_lifecycle(
            HookPhase::Startup,
            lifecycle_fn("open_db", |_| Err(HookError::failed("open_db", "refused"))),
        )
        .unwrap();

    let err = website.start().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Hook);
    assert!(err.message.contains("open_db"));
}

#[tokio::test]
async fn test_startup_hooks_see_configuration() {
    let trail = Trail::new();
    let config = WebsiteConfig {
        network_engine: "tornado".to_string(),
        ..Default::default()
    };
    let mut website: Website = Website::new(config).unwrap();

    let seen = trail.clone();
    website
        .hooks
        .register_lifecycle(
            HookPhase::Startup,
            lifecycle_fn("engine", move |config| {
                seen.push(&config.network_engine);
                Ok(())
            }),
        )
        .unwrap();

    website.start().await.unwrap();
    assert_eq!(trail.entries(), vec!["tornado"]);
}

#[tokio::test]
async fn test_stop_runs_every_shutdown_hook() {
    let trail = Trail::new();
    let mut website = helpers::website();
    for (name, fails) in [("flush", true), ("close", false)] {
        let trail = trail.clone();
        website
            .hooks
            .register_lifecycle(
                HookPhase::Shutdown,
                lifecycle_fn(name, move |_| {
                    trail.push(name);
                    if fails {
                        Err(HookError::failed(name, "disk full"))
                    } else {
                        Ok(())
                    }
                }),
            )
            .unwrap();
    }

    let failures = website.stop().await;
    assert_eq!(trail.entries(), vec!["flush", "close"]);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].hook, "flush");
}

#[test]
fn test_numeric_index_names_from_environment() {
    let config = WebsiteConfig::from_vars([("ASPEN_INDICES", "404")]).unwrap();
    let website: Website = Website::new(config).unwrap();
    assert_eq!(website.config.indices, vec!["404"]);
}

#[test]
fn test_configuration_from_environment_variables() {
    let config = WebsiteConfig::from_vars([
        ("ASPEN_UNAVAILABLE", "2"),
        ("ASPEN_SHOW_TRACEBACKS", "true"),
        ("ASPEN_RENDERER_DEFAULT", "jinja2"),
    ])
    .unwrap();
    let website: Website = Website::new(config).unwrap();

    assert!(website.config.show_tracebacks);
    assert_eq!(website.config.renderer_default, "jinja2");
    assert_eq!(website.hooks.len(HookPhase::InboundEarly), 1);
}
