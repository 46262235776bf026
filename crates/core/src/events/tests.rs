// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the events system

use super::*;
use std::sync::Arc;

fn granted(pid: &str) -> Event {
    Event::RequestGranted {
        pid: ProcessId::new(pid),
        request: ResourceVector::from([1, 0]),
        allocation: ResourceVector::from([1, 0]),
        need: ResourceVector::from([0, 1]),
        available: ResourceVector::from([0, 1]),
    }
}

#[test]
fn event_names_are_namespaced() {
    assert_eq!(granted("P1").name(), "request:granted");
    assert_eq!(
        Event::CycleDetected { cycle: vec![] }.name(),
        "cycle:detected"
    );
    assert_eq!(
        Event::InvariantViolated {
            detail: "x".to_string()
        }
        .name(),
        "invariant:violated"
    );
}

#[test]
fn display_mirrors_step_messages() {
    assert_eq!(
        granted("P1").to_string(),
        "P1 GRANTED [1, 0] -> ALLOC=[1, 0], NEED=[0, 1], AVAIL=[0, 1]"
    );

    let cycle = Event::CycleDetected {
        cycle: vec![ProcessId::new("P1"), ProcessId::new("P2")],
    };
    assert_eq!(cycle.to_string(), "[DETECT] cycle found: P1 -> P2");
}

#[test]
fn pending_display_names_the_reason() {
    let event = Event::RequestPending {
        pid: ProcessId::new("P2"),
        request: ResourceVector::from([0, 1]),
        reason: WaitReason::Unsafe,
    };
    assert!(event.to_string().contains("unsafe by Banker's"));
}

#[test]
fn pid_is_exposed_for_process_events() {
    assert_eq!(granted("P7").pid(), Some(&ProcessId::new("P7")));
    assert_eq!(Event::CycleDetected { cycle: vec![] }.pid(), None);
}

#[test]
fn event_roundtrips_through_json() {
    let event = granted("P1");
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[tokio::test]
async fn fanout_feeds_channel_and_recorder_in_order() {
    let recorder = RecordingSink::new();
    let (channel, mut rx) = ChannelSink::new();
    let fanout = FanoutSink::new()
        .with(Arc::new(recorder.clone()))
        .with(Arc::new(channel));

    fanout.emit(&granted("P1"));
    fanout.emit(&granted("P2"));

    assert_eq!(recorder.events().len(), 2);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(second.sequence, 2);
    assert_eq!(second.event.pid(), Some(&ProcessId::new("P2")));
}
