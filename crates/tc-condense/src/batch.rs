//! Parallel condensing of independent networks.
//!
//! Each well or fracture owns its own small network, so many of them can be
//! eliminated at once. A single network is still reduced sequentially.

use rayon::prelude::*;
use tc_network::ConductanceNetwork;

use crate::condenser::TransmissibilityCondenser;
use crate::eliminate::eliminate;
use crate::ordering::EliminationOrder;
use crate::result::CondensedTransmissibilities;

/// Refresh the cached result of every condenser in parallel.
pub fn condense_all(condensers: &mut [TransmissibilityCondenser]) {
    condensers.par_iter_mut().for_each(|condenser| {
        condenser.condensed();
    });
}

/// Condense each network, preserving input order.
pub fn condense_networks(
    networks: &[ConductanceNetwork],
    order: EliminationOrder,
) -> Vec<CondensedTransmissibilities> {
    networks
        .par_iter()
        .map(|network| eliminate(network.clone(), order))
        .collect()
}
