//! Stable indexing for dense matrix assembly.
//!
//! Provides a bidirectional mapping between node addresses and contiguous
//! matrix indices (0..N), with retained nodes first.

use std::collections::BTreeMap;
use tc_core::NodeAddress;

use crate::network::ConductanceNetwork;

/// Index map providing stable, contiguous indices for network nodes.
///
/// Retained nodes occupy `0..retained_count()`, eliminated nodes follow.
/// Within each block nodes are in address order.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of addresses (index -> address).
    addresses: Vec<NodeAddress>,

    /// Reverse lookup: address -> index.
    positions: BTreeMap<NodeAddress, usize>,

    retained_count: usize,
}

impl IndexMap {
    /// Build an index map over every node of a network.
    pub fn from_network(network: &ConductanceNetwork) -> Self {
        Self::from_nodes(network.all_nodes())
    }

    /// Build an index map over an explicit node set.
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeAddress>) -> Self {
        let (mut addresses, eliminated): (Vec<_>, Vec<_>) =
            nodes.into_iter().partition(|n| n.retained);
        addresses.sort();
        addresses.dedup();
        let retained_count = addresses.len();

        let mut eliminated = eliminated;
        eliminated.sort();
        eliminated.dedup();
        addresses.extend(eliminated);

        let positions = addresses
            .iter()
            .enumerate()
            .map(|(i, &a)| (a, i))
            .collect();

        Self {
            addresses,
            positions,
            retained_count,
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Number of retained nodes (the leading block).
    pub fn retained_count(&self) -> usize {
        self.retained_count
    }

    /// Get the contiguous index for an address.
    pub fn index_of(&self, node: NodeAddress) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    /// Get the address for a contiguous index (panics if out of bounds).
    pub fn address(&self, i: usize) -> NodeAddress {
        self.addresses[i]
    }

    /// All addresses in index order.
    pub fn addresses(&self) -> &[NodeAddress] {
        &self.addresses
    }
}
