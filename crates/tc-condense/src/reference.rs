//! Dense Schur-complement condensation.
//!
//! Assembles the weighted Laplacian `L` with retained nodes first and solves
//!
//! ```text
//! S = L_RR - L_RE * L_EE⁻¹ * L_ER
//! ```
//!
//! The condensed transmissibility of `(a, b)` is `-S[a, b]`. This is an
//! independent path to the same values as [`crate::eliminate`] and is used to
//! cross-check it. Cost is cubic in the number of eliminated nodes.

use nalgebra::DMatrix;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tc_core::{NodeAddress, Real, Tolerances};
use tc_network::{ConductanceNetwork, IndexMap};
use tracing::{debug, warn};

use crate::eliminate::EliminationStats;
use crate::error::{CondenserError, CondenserResult};
use crate::result::CondensedTransmissibilities;

/// Condense `network` by a dense LU solve.
///
/// Eliminated nodes with no positive-weight path to a retained node carry no
/// flow between retained nodes and are dropped first, which keeps `L_EE`
/// nonsingular.
pub fn dense_condense(network: &ConductanceNetwork) -> CondenserResult<CondensedTransmissibilities> {
    let retained: BTreeSet<NodeAddress> = network.retained_nodes().collect();
    let coupled = coupled_eliminated(network, &retained);
    let dropped = network.eliminated_nodes().count() - coupled.len();

    let index = IndexMap::from_nodes(retained.iter().copied().chain(coupled));
    let n = index.len();
    let r = index.retained_count();
    let e = n - r;
    debug!(retained = r, eliminated = e, dropped, "assembling dense Laplacian");

    let mut laplacian = DMatrix::<Real>::zeros(n, n);
    for (a, b, w) in network.edges() {
        let (Some(i), Some(j)) = (index.index_of(a), index.index_of(b)) else {
            continue;
        };
        laplacian[(i, i)] += w;
        laplacian[(j, j)] += w;
        laplacian[(i, j)] -= w;
        laplacian[(j, i)] -= w;
    }

    let l_rr = laplacian.view((0, 0), (r, r)).into_owned();
    let schur = if e == 0 {
        l_rr
    } else {
        let l_re = laplacian.view((0, r), (r, e)).into_owned();
        let l_er = laplacian.view((r, 0), (e, r)).into_owned();
        let l_ee = laplacian.view((r, r), (e, e)).into_owned();

        let x = l_ee.lu().solve(&l_er).ok_or_else(|| {
            warn!(eliminated = e, "eliminated block is singular");
            CondenserError::Numeric {
                what: format!("singular {e}x{e} eliminated block"),
            }
        })?;
        &l_rr - &l_re * &x
    };

    let tol = Tolerances::default();
    let mut values = BTreeMap::new();
    for i in 0..r {
        for j in (i + 1)..r {
            let value = -schur[(i, j)];
            if value > tol.abs {
                values.insert((index.address(i), index.address(j)), value);
            }
        }
    }

    let stats = EliminationStats {
        eliminated: e + dropped,
        skipped: dropped,
        fill_edges: 0,
    };
    Ok(CondensedTransmissibilities::new(values, retained, stats))
}

/// Eliminated nodes reachable from a retained node through positive-weight
/// edges that pass only through eliminated nodes.
fn coupled_eliminated(
    network: &ConductanceNetwork,
    retained: &BTreeSet<NodeAddress>,
) -> BTreeSet<NodeAddress> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<NodeAddress> = retained.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        for (neighbor, w) in network.neighbors(node) {
            if neighbor.retained || w <= 0.0 {
                continue;
            }
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen
}
