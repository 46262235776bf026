// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn record(id: &str, allocation: &[u32], waiting: Option<&[u32]>) -> ProcessRecord {
    let allocation = ResourceVector::new(allocation.to_vec());
    let max = ResourceVector::new(vec![1; allocation.len()]);
    ProcessRecord {
        id: ProcessId::new(id),
        need: max.checked_sub(&allocation).unwrap(),
        max,
        allocation,
        waiting: waiting.map(|w| ResourceVector::new(w.to_vec())),
        alive: true,
    }
}

fn pid(id: &str) -> ProcessId {
    ProcessId::new(id)
}

#[test]
fn crossed_claims_form_two_cycle() {
    let records = vec![
        record("P1", &[1, 0], Some(&[0, 1])),
        record("P2", &[0, 1], Some(&[1, 0])),
    ];
    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(2));

    assert!(graph.has_edge(&pid("P1"), &pid("P2")));
    assert!(graph.has_edge(&pid("P2"), &pid("P1")));
    assert_eq!(graph.find_cycle(), Some(vec![pid("P1"), pid("P2")]));
}

#[test]
fn three_way_ring_is_found_from_first_node() {
    let records = vec![
        record("A", &[1, 0, 0], Some(&[0, 1, 0])),
        record("B", &[0, 1, 0], Some(&[0, 0, 1])),
        record("C", &[0, 0, 1], Some(&[1, 0, 0])),
    ];
    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(3));
    assert_eq!(graph.find_cycle(), Some(vec![pid("A"), pid("B"), pid("C")]));
}

#[test]
fn cycle_excludes_tail_leading_into_it() {
    // T waits on A; A and B wait on each other.
    let records = vec![
        record("T", &[0, 0, 0], Some(&[1, 0, 0])),
        record("A", &[1, 0, 0], Some(&[0, 1, 0])),
        record("B", &[0, 1, 0], Some(&[1, 0, 0])),
    ];
    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(3));
    assert_eq!(graph.find_cycle(), Some(vec![pid("A"), pid("B")]));
}

#[test]
fn chain_without_back_edge_has_no_cycle() {
    let records = vec![
        record("P1", &[0, 0], Some(&[1, 0])),
        record("P2", &[1, 0], Some(&[0, 1])),
        record("P3", &[0, 1], None),
    ];
    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(2));
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.find_cycle(), None);
}

#[test]
fn satisfiable_request_adds_no_edges() {
    let records = vec![
        record("P1", &[1, 0], Some(&[0, 1])),
        record("P2", &[0, 1], None),
    ];
    // Resource 1 is available, so P1's wait is not a real shortage.
    let graph = WaitForGraph::build(&records, &ResourceVector::from([0, 1]));
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.successors(&pid("P1")).is_empty());
}

#[test]
fn dead_processes_neither_wait_nor_hold() {
    let mut dead = record("P2", &[0, 1], Some(&[1, 0]));
    dead.alive = false;
    let records = vec![record("P1", &[1, 0], Some(&[0, 1])), dead];

    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(2));
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.find_cycle(), None);
}

#[test]
fn holder_of_several_short_types_gets_one_edge() {
    let records = vec![
        record("P1", &[0, 0], Some(&[1, 1])),
        record("P2", &[1, 1], None),
    ];
    let graph = WaitForGraph::build(&records, &ResourceVector::zeros(2));
    assert_eq!(graph.successors(&pid("P1")), vec![pid("P2")]);
}
