//! Star-mesh elimination of non-retained nodes.
//!
//! Eliminating node `x` with neighbor weights `g_1..g_k` and `S = Σ g_i`
//! removes `x` and adds `g_i * g_j / S` to every neighbor pair `(i, j)`.
//! Repeating this for every eliminated node is Gaussian elimination on the
//! weighted Laplacian: what remains is its Schur complement on the retained
//! block. All fill terms are non-negative, so there is no cancellation.

use std::collections::BTreeSet;
use tc_core::{NodeAddress, Real};
use tc_network::ConductanceNetwork;
use tracing::{debug, trace};

use crate::ordering::{EliminationOrder, EliminationQueue};
use crate::result::CondensedTransmissibilities;

/// Counters collected during one elimination pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliminationStats {
    /// Nodes removed from the network.
    pub eliminated: usize,
    /// Eliminated nodes whose incident weights summed to zero.
    pub skipped: usize,
    /// Edges created between previously unconnected neighbors.
    pub fill_edges: usize,
}

/// Reduce `network` to its retained nodes.
///
/// Consumes the network; callers that need the raw edges afterwards pass a
/// clone. Never fails for a network built through `add_edge`.
pub fn eliminate(mut network: ConductanceNetwork, order: EliminationOrder) -> CondensedTransmissibilities {
    debug!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        ?order,
        "starting elimination pass"
    );

    let retained: BTreeSet<NodeAddress> = network.retained_nodes().collect();
    let mut queue = EliminationQueue::new(&network, order);
    let mut stats = EliminationStats::default();

    while let Some(node) = queue.pop() {
        let star = network.remove_node(node);
        stats.eliminated += 1;

        let total: Real = star.iter().map(|&(_, g)| g).sum();
        if total == 0.0 {
            trace!(%node, degree = star.len(), "no conductance to redistribute");
            stats.skipped += 1;
            queue.refresh(&network, &star);
            continue;
        }

        trace!(%node, degree = star.len(), total, "eliminating");
        stats.fill_edges += mesh(&mut network, &star, total);
        queue.refresh(&network, &star);
    }

    debug!(
        retained = retained.len(),
        condensed_edges = network.edge_count(),
        eliminated = stats.eliminated,
        skipped = stats.skipped,
        fill_edges = stats.fill_edges,
        "elimination pass finished"
    );

    CondensedTransmissibilities::from_reduced(&network, retained, stats)
}

/// Connect every pair of a removed node's neighbors. Returns the number of
/// new edges.
fn mesh(network: &mut ConductanceNetwork, star: &[(NodeAddress, Real)], total: Real) -> usize {
    let mut created = 0;
    for (i, &(a, ga)) in star.iter().enumerate() {
        for &(b, gb) in &star[i + 1..] {
            // Quotient first: the product of two large weights can overflow
            let fill = ga * (gb / total);
            // Zero-weight branches must not connect otherwise unconnected nodes
            if fill == 0.0 {
                continue;
            }
            if !network.has_edge(a, b) {
                created += 1;
            }
            network.merge_conductance(a, b, fill);
        }
    }
    created
}
