//! Condensed transmissibilities between retained nodes.

use std::collections::{BTreeMap, BTreeSet};
use tc_core::{NodeAddress, Real};
use tc_network::ConductanceNetwork;

use crate::eliminate::EliminationStats;

/// Read-only map from unordered retained pairs to condensed transmissibility.
///
/// Pairs with no connection in the raw network are absent and read as
/// 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CondensedTransmissibilities {
    /// Keyed by `(lower, higher)` address.
    values: BTreeMap<(NodeAddress, NodeAddress), Real>,
    retained: BTreeSet<NodeAddress>,
    stats: EliminationStats,
}

fn pair_key(a: NodeAddress, b: NodeAddress) -> (NodeAddress, NodeAddress) {
    if a <= b { (a, b) } else { (b, a) }
}

impl CondensedTransmissibilities {
    pub(crate) fn new(
        values: BTreeMap<(NodeAddress, NodeAddress), Real>,
        retained: BTreeSet<NodeAddress>,
        stats: EliminationStats,
    ) -> Self {
        Self {
            values,
            retained,
            stats,
        }
    }

    /// Collect the edges of a fully reduced network.
    pub(crate) fn from_reduced(
        network: &ConductanceNetwork,
        retained: BTreeSet<NodeAddress>,
        stats: EliminationStats,
    ) -> Self {
        let values = network.edges().map(|(a, b, w)| ((a, b), w)).collect();
        Self::new(values, retained, stats)
    }

    /// Condensed transmissibility between `a` and `b`, symmetric in its
    /// arguments. 0.0 if the pair is not connected.
    pub fn get(&self, a: NodeAddress, b: NodeAddress) -> Real {
        self.values.get(&pair_key(a, b)).copied().unwrap_or(0.0)
    }

    /// Every retained node of the source network, connected or not.
    pub fn retained_nodes(&self) -> &BTreeSet<NodeAddress> {
        &self.retained
    }

    pub fn contains_node(&self, node: NodeAddress) -> bool {
        self.retained.contains(&node)
    }

    /// Each connected pair once, as `(lower, higher, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (NodeAddress, NodeAddress, Real)> + '_ {
        self.values.iter().map(|(&(a, b), &w)| (a, b, w))
    }

    /// All condensed connections of `node`.
    pub fn row(&self, node: NodeAddress) -> impl Iterator<Item = (NodeAddress, Real)> + '_ {
        self.iter().filter_map(move |(a, b, w)| {
            if a == node {
                Some((b, w))
            } else if b == node {
                Some((a, w))
            } else {
                None
            }
        })
    }

    /// Number of connected pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn stats(&self) -> EliminationStats {
        self.stats
    }
}
