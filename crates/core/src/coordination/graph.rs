// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait-for graph and cycle detection
//!
//! The graph is rebuilt from scratch on every detection pass. An edge `p -> q`
//! means `p` is blocked on a resource type that is genuinely short and `q`
//! holds some of it.

use super::process::{ProcessId, ProcessRecord};
use crate::vector::ResourceVector;

/// Directed wait-for graph over live processes
#[derive(Clone, Debug)]
pub struct WaitForGraph {
    ids: Vec<ProcessId>,
    /// Live record indices in registration order
    nodes: Vec<usize>,
    /// Successors per record index, in registration order
    edges: Vec<Vec<usize>>,
}

impl WaitForGraph {
    /// Build the graph from pending requests and current allocations
    pub fn build(records: &[ProcessRecord], available: &ResourceVector) -> Self {
        let ids = records.iter().map(|r| r.id.clone()).collect();
        let nodes = (0..records.len()).filter(|&i| records[i].alive).collect();
        let mut edges = vec![Vec::new(); records.len()];

        for (p, record) in records.iter().enumerate() {
            let Some(request) = record.waiting.as_ref().filter(|_| record.alive) else {
                continue;
            };
            for r in 0..request.len() {
                // Only real shortages; a request held back by the safety check waits on nobody.
                if request.get(r) == 0 || available.get(r) >= request.get(r) {
                    continue;
                }
                for (q, holder) in records.iter().enumerate() {
                    if q != p
                        && holder.alive
                        && holder.allocation.get(r) > 0
                        && !edges[p].contains(&q)
                    {
                        edges[p].push(q);
                    }
                }
            }
            edges[p].sort_unstable();
        }

        Self { ids, nodes, edges }
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Processes that `id` waits for
    pub fn successors(&self, id: &ProcessId) -> Vec<ProcessId> {
        self.ids
            .iter()
            .position(|x| x == id)
            .map(|p| self.edges[p].iter().map(|&q| self.ids[q].clone()).collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, from: &ProcessId, to: &ProcessId) -> bool {
        self.successors(from).contains(to)
    }

    /// Find the first cycle, searching from each unvisited node in registration order
    ///
    /// Uses an explicit stack of `(node, next successor)` frames; the cycle is
    /// the slice of the stack from the back-edge target to the top. Single-node
    /// cycles are never reported: a process cannot deadlock against itself.
    pub fn find_cycle(&self) -> Option<Vec<ProcessId>> {
        let n = self.edges.len();
        let mut visited = vec![false; n];
        let mut on_path = vec![false; n];

        for &start in &self.nodes {
            if visited[start] {
                continue;
            }

            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            visited[start] = true;
            on_path[start] = true;

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let Some(&succ) = self.edges[node].get(next) else {
                    on_path[node] = false;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                if on_path[succ] {
                    if let Some(pos) = stack.iter().position(|&(n, _)| n == succ) {
                        if stack.len() - pos > 1 {
                            return Some(
                                stack[pos..]
                                    .iter()
                                    .map(|&(n, _)| self.ids[n].clone())
                                    .collect(),
                            );
                        }
                    }
                } else if !visited[succ] {
                    visited[succ] = true;
                    on_path[succ] = true;
                    stack.push((succ, 0));
                }
            }
        }

        None
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
