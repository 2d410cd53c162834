//! Sparse undirected conductance network.

use std::collections::{BTreeMap, BTreeSet};
use tc_core::{NodeAddress, Real};

use crate::error::{NetworkError, NetworkResult};
use crate::validate;

/// Sparse, symmetric, weighted network keyed by node address.
///
/// Each unordered pair holds at most one edge; parallel contributions are
/// summed. Both directions are stored so neighbor lookups are a single map
/// access. `BTreeMap` keeps every iteration ordered by address, which makes
/// elimination results reproducible bit for bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConductanceNetwork {
    adjacency: BTreeMap<NodeAddress, BTreeMap<NodeAddress, Real>>,
}

impl ConductanceNetwork {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the edge between `a` and `b`, creating nodes as needed.
    ///
    /// Rejects self-loops, negative or non-finite weights, contributions that
    /// would push either endpoint's total conductance past `f64::MAX`, and
    /// addresses whose cell is already present with the opposite retained
    /// flag. The network is unchanged on error.
    pub fn add_edge(&mut self, a: NodeAddress, b: NodeAddress, weight: Real) -> NetworkResult<()> {
        self.check_edge(a, b, weight)?;
        self.merge_conductance(a, b, weight);
        Ok(())
    }

    /// Run the `add_edge` validation without modifying the network.
    pub fn check_edge(&self, a: NodeAddress, b: NodeAddress, weight: Real) -> NetworkResult<()> {
        validate::validate_edge(&self.adjacency, a, b, weight)
    }

    /// Accumulate `weight` onto edge `(a, b)` without validation.
    ///
    /// Used by the elimination engine, whose fill terms are non-negative by
    /// construction and only ever connect nodes already in the network.
    pub fn merge_conductance(&mut self, a: NodeAddress, b: NodeAddress, weight: Real) {
        debug_assert!(a != b, "self-loop {a}");
        debug_assert!(weight >= 0.0 && weight.is_finite(), "bad weight {weight}");

        *self.adjacency.entry(a).or_default().entry(b).or_insert(0.0) += weight;
        *self.adjacency.entry(b).or_default().entry(a).or_insert(0.0) += weight;
    }

    /// Multiply the edge between `a` and `b` by `factor`.
    ///
    /// Returns `Ok(false)` if no such edge exists. A factor that would make an
    /// endpoint's total conductance non-finite is rejected as `InvalidScale`.
    pub fn scale_edge(&mut self, a: NodeAddress, b: NodeAddress, factor: Real) -> NetworkResult<bool> {
        validate::validate_scale(a, b, factor)?;

        let Some(weight) = self.adjacency.get(&a).and_then(|m| m.get(&b)).copied() else {
            return Ok(false);
        };
        let scaled = weight * factor;
        for node in [a, b] {
            if !(self.total_conductance(node) - weight + scaled).is_finite() {
                return Err(NetworkError::InvalidScale { a, b, factor });
            }
        }

        for (from, to) in [(a, b), (b, a)] {
            if let Some(w) = self.adjacency.get_mut(&from).and_then(|m| m.get_mut(&to)) {
                *w = scaled;
            }
        }
        Ok(true)
    }

    /// Sum of the weights of all edges incident to `node`.
    pub fn total_conductance(&self, node: NodeAddress) -> Real {
        validate::total_conductance(&self.adjacency, node)
    }

    /// All edges incident to `node`, ascending by neighbor address.
    ///
    /// Returns a snapshot; empty if the node is unknown.
    pub fn neighbors(&self, node: NodeAddress) -> Vec<(NodeAddress, Real)> {
        self.adjacency
            .get(&node)
            .map(|m| m.iter().map(|(&n, &w)| (n, w)).collect())
            .unwrap_or_default()
    }

    /// Remove `node` and all incident edges, returning the removed edges.
    ///
    /// Former neighbors stay in the network even if this leaves them isolated.
    pub fn remove_node(&mut self, node: NodeAddress) -> Vec<(NodeAddress, Real)> {
        let Some(edges) = self.adjacency.remove(&node) else {
            return Vec::new();
        };
        for neighbor in edges.keys() {
            if let Some(m) = self.adjacency.get_mut(neighbor) {
                m.remove(&node);
            }
        }
        edges.into_iter().collect()
    }

    /// Accumulated weight of edge `(a, b)`, 0.0 when absent.
    pub fn weight(&self, a: NodeAddress, b: NodeAddress) -> Real {
        self.adjacency
            .get(&a)
            .and_then(|m| m.get(&b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_edge(&self, a: NodeAddress, b: NodeAddress) -> bool {
        self.adjacency.get(&a).is_some_and(|m| m.contains_key(&b))
    }

    /// True if `node` is in the network and flagged retained.
    pub fn is_retained(&self, node: NodeAddress) -> bool {
        node.retained && self.adjacency.contains_key(&node)
    }

    pub fn contains(&self, node: NodeAddress) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Number of edges incident to `node`.
    pub fn degree(&self, node: NodeAddress) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeMap::len)
    }

    pub fn all_nodes(&self) -> BTreeSet<NodeAddress> {
        self.adjacency.keys().copied().collect()
    }

    pub fn retained_nodes(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        self.adjacency.keys().copied().filter(|n| n.retained)
    }

    pub fn eliminated_nodes(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        self.adjacency.keys().copied().filter(|n| !n.retained)
    }

    /// Each unordered edge once, as `(lower, higher, weight)` in address order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeAddress, NodeAddress, Real)> + '_ {
        self.adjacency.iter().flat_map(|(&a, m)| {
            m.range((std::ops::Bound::Excluded(a), std::ops::Bound::Unbounded))
                .map(move |(&b, &w)| (a, b, w))
        })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
