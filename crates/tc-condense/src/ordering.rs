//! Elimination ordering.
//!
//! The order in which eliminated nodes are folded away does not change the
//! exact condensed values, only floating-point rounding and the amount of
//! fill created along the way. Every order here is deterministic so that the
//! same edge set always condenses to bit-identical results.

use std::collections::{BTreeMap, BTreeSet};
use tc_core::{NodeAddress, Real};
use tc_network::ConductanceNetwork;

/// Strategy for picking the next node to eliminate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EliminationOrder {
    /// Ascending `(domain, index)`.
    #[default]
    Canonical,
    /// Smallest current degree first, ties by ascending address.
    ///
    /// Keeps the star-mesh fill small when a few hub nodes touch many cells.
    MinimumDegree,
}

/// Pending eliminated nodes in the order they will be processed.
pub(crate) enum EliminationQueue {
    Canonical(std::vec::IntoIter<NodeAddress>),
    MinimumDegree {
        pending: BTreeSet<(usize, NodeAddress)>,
        degree: BTreeMap<NodeAddress, usize>,
    },
}

impl EliminationQueue {
    pub(crate) fn new(network: &ConductanceNetwork, order: EliminationOrder) -> Self {
        match order {
            EliminationOrder::Canonical => {
                let nodes: Vec<_> = network.eliminated_nodes().collect();
                Self::Canonical(nodes.into_iter())
            }
            EliminationOrder::MinimumDegree => {
                let degree: BTreeMap<_, _> = network
                    .eliminated_nodes()
                    .map(|n| (n, network.degree(n)))
                    .collect();
                let pending = degree.iter().map(|(&n, &d)| (d, n)).collect();
                Self::MinimumDegree { pending, degree }
            }
        }
    }

    /// Next node to eliminate.
    pub(crate) fn pop(&mut self) -> Option<NodeAddress> {
        match self {
            Self::Canonical(nodes) => nodes.next(),
            Self::MinimumDegree { pending, degree } => {
                let (_, node) = pending.pop_first()?;
                degree.remove(&node);
                Some(node)
            }
        }
    }

    /// Re-rank the former neighbors of a node that was just eliminated.
    pub(crate) fn refresh(&mut self, network: &ConductanceNetwork, star: &[(NodeAddress, Real)]) {
        let Self::MinimumDegree { pending, degree } = self else {
            return;
        };
        for &(neighbor, _) in star {
            if let Some(d) = degree.get_mut(&neighbor) {
                pending.remove(&(*d, neighbor));
                *d = network.degree(neighbor);
                pending.insert((*d, neighbor));
            }
        }
    }
}
