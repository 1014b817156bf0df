//! Directed graph with deterministic topological sort
//!
//! This module provides the scheduling graph used to check execution
//! dependencies between commands.
//!
//! ## Graph Structure
//!
//! Nodes are command full names. An edge `A → B` means "A must complete
//! before B may run":
//!
//! ```text
//! nodes:  [build, test, release]      (first-seen insertion order)
//! edges:  build → test, test → release
//! ```
//!
//! ## Algorithm
//!
//! Uses Kahn's algorithm:
//!
//! 1. Compute the in-degree of every node
//! 2. Seed a FIFO queue with the zero in-degree nodes **in insertion order**
//! 3. Dequeue, emit, and decrement the in-degree of each neighbor; enqueue
//!    any neighbor that reaches zero
//!
//! Nodes left with a nonzero in-degree once the queue drains are stuck in
//! (or behind) a cycle and are reported together.
//!
//! ## Usage
//!
//! ```rust
//! use cmdweave::graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_edge("build", "test");
//! graph.add_edge("test", "release");
//!
//! let order = graph.topological_sort().expect("acyclic");
//! assert_eq!(order, vec!["build", "test", "release"]);
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::{Result, validation::circular};

/// Directed graph keyed by node name
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node names in first-seen order
    nodes: Vec<String>,
    /// Node name → position in `nodes`
    index: HashMap<String, usize>,
    /// Adjacency lists, parallel to `nodes`
    edges: Vec<Vec<usize>>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index
    ///
    /// Adding an existing node is a no-op; the node keeps its original
    /// insertion position.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.edges.push(Vec::new());
        idx
    }

    /// Add an edge `from → to`, adding either endpoint if missing
    ///
    /// Duplicate edges are kept; they only raise the in-degree of `to` and
    /// are decremented the same number of times during the sort.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.edges[from_idx].push(to_idx);
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Whether the graph contains the named node
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Compute a scheduling order for all nodes
    ///
    /// Returns an empty order for an empty graph.
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` listing every node that could not be
    /// scheduled. The list is not necessarily a minimal cycle, but every node
    /// that sits on a cycle is included. No partial order is returned.
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }

        let mut in_degree = vec![0usize; self.nodes.len()];
        for targets in &self.edges {
            for &to in targets {
                in_degree[to] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&idx| in_degree[idx] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(idx) = queue.pop_front() {
            order.push(self.nodes[idx].clone());
            for &next in &self.edges[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() < self.nodes.len() {
            let stuck = (0..self.nodes.len())
                .filter(|&idx| in_degree[idx] > 0)
                .map(|idx| self.nodes[idx].clone())
                .collect();
            return Err(circular(stuck));
        }

        Ok(order)
    }
}
