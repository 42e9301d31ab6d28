//! Integration tests for hook registration and ordering.

mod helpers;

use std::sync::Arc;

use aspen::HookPhase;
use aspen_hooks::{HookError, RequestContext, RequestHook};

use helpers::{Trail, recording};

const REQUEST_PHASES: [HookPhase; 4] = [
    HookPhase::InboundEarly,
    HookPhase::InboundLate,
    HookPhase::OutboundEarly,
    HookPhase::OutboundLate,
];

fn same(a: &Arc<dyn RequestHook<RequestContext>>, b: &Arc<dyn RequestHook<RequestContext>>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[test]
fn test_register_preserves_order_in_every_phase() {
    let trail = Trail::new();
    let mut website = helpers::website();

    for phase in REQUEST_PHASES {
        let c1 = recording("c1", &trail);
        let c2 = recording("c2", &trail);
        let hooks = website.hooks.request_mut(phase).unwrap();
        hooks.register(c1.clone());
        hooks.register(c2.clone());

        let listed: Vec<_> = hooks.iter().cloned().collect();
        assert_eq!(listed.len(), 2);
        assert!(same(&listed[0], &c1));
        assert!(same(&listed[1], &c2));
    }
}

#[test]
fn test_insert_at_zero_goes_first() {
    let trail = Trail::new();
    let mut website = helpers::website();
    let hooks = &mut website.hooks.inbound_late;
    hooks.register(recording("a", &trail));
    hooks.register(recording("b", &trail));
    hooks.insert(0, recording("first", &trail)).unwrap();

    assert_eq!(
        helpers::names(&website, HookPhase::InboundLate),
        vec!["first", "a", "b"]
    );
}

#[test]
fn test_remove_restores_previous_contents() {
    let trail = Trail::new();
    let mut website = helpers::website();
    website.hooks.outbound_early.register(recording("keep", &trail));
    let before = helpers::names(&website, HookPhase::OutboundEarly);

    let extra = recording("extra", &trail);
    website.hooks.outbound_early.register(extra.clone());
    website.hooks.outbound_early.remove(&extra).unwrap();
    assert_eq!(helpers::names(&website, HookPhase::OutboundEarly), before);

    let err = website.hooks.outbound_early.remove(&extra).unwrap_err();
    assert!(matches!(err, HookError::NotFound { name } if name == "extra"));
}

#[test]
fn test_unknown_phase_names_fail() {
    let website = helpers::website();
    for name in ["", "request", "inbound", "Inbound_Early", "outbound-late", "teardown"] {
        assert!(
            matches!(website.hooks.len_of(name), Err(HookError::UnknownPhase(ref n)) if n == name),
            "{name} should not resolve"
        );
        assert!(name.parse::<HookPhase>().is_err());
    }
    for phase in HookPhase::ALL {
        assert_eq!(website.hooks.len_of(phase.as_str()).unwrap(), 0);
    }
}

#[test]
fn test_pop_out_of_range_leaves_sequence() {
    let trail = Trail::new();
    let mut website = helpers::website();
    website.hooks.outbound_late.register(recording("only", &trail));

    for index in [1, 2, 100] {
        let err = website.hooks.outbound_late.pop(index).unwrap_err();
        assert!(matches!(err, HookError::IndexOutOfRange { len: 1, .. }));
    }
    assert_eq!(
        helpers::names(&website, HookPhase::OutboundLate),
        vec!["only"]
    );
}

#[test]
fn test_pop_middle_of_inbound_early() {
    let trail = Trail::new();
    let mut website = helpers::website();
    let a = recording("A", &trail);
    let b = recording("B", &trail);
    let c = recording("C", &trail);
    for hook in [&a, &b, &c] {
        website
            .hooks
            .register_request(HookPhase::InboundEarly, hook.clone())
            .unwrap();
    }
    assert_eq!(
        website.hooks.names_of("inbound_early").unwrap(),
        vec!["A", "B", "C"]
    );

    let popped = website.hooks.inbound_early.pop(1).unwrap();
    assert!(same(&popped, &b));
    assert_eq!(
        website.hooks.names_of("inbound_early").unwrap(),
        vec!["A", "C"]
    );
}

#[tokio::test]
async fn test_inbound_runs_early_before_late() {
    let trail = Trail::new();
    let mut website = helpers::website();
    website.hooks.inbound_late.register(recording("late", &trail));
    website.hooks.inbound_early.register(recording("early", &trail));
    website.hooks.outbound_early.register(recording("out", &trail));

    let mut request = RequestContext::new("GET", "/");
    website.handle_inbound(&mut request).await.unwrap();
    assert_eq!(trail.entries(), vec!["early", "late"]);

    website.handle_outbound(&mut request).await.unwrap();
    assert_eq!(trail.entries(), vec!["early", "late", "out"]);
}

#[tokio::test]
async fn test_inbound_failure_skips_remaining_hooks() {
    let trail = Trail::new();
    let mut website = helpers::website();
    website.hooks.inbound_early.register(recording("one", &trail));
    website
        .hooks
        .inbound_early
        .register(helpers::failing("two", &trail));
    website.hooks.inbound_early.register(recording("three", &trail));
    website.hooks.inbound_late.register(recording("late", &trail));

    let mut request = RequestContext::new("POST", "/form");
    let err = website.handle_inbound(&mut request).await.unwrap_err();

    assert!(matches!(err, HookError::Failed { ref hook, .. } if hook == "two"));
    assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trail.entries(), vec!["one", "two"]);
}
