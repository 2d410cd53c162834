//! Pressure-depletion correction of condensed transmissibilities.
//!
//! When the retained cells of one domain (typically matrix cells around a
//! fracture) are depleted unevenly, their transmissibilities into the
//! eliminated network are scaled by each cell's relative pressure drop and
//! the network is condensed again. The scaled result is then split into a
//! fictitious "eliminated network to target" transmissibility per cell and
//! recombined in series with the unscaled lumped value:
//!
//! ```text
//! T_ft  = T_mf * T_mt / (T_mf - T_mt)
//! T_eff = T_mf0 * T_ft / (T_mf0 + T_ft)
//! ```
//!
//! With every factor equal to one, `T_eff` reproduces the plain condensed
//! value.

use std::collections::BTreeMap;
use tc_core::{Domain, NodeAddress, Real, ensure_finite, series};
use tracing::debug;

use crate::condenser::TransmissibilityCondenser;
use crate::error::CondenserResult;

/// Per-cell scale factors derived from pressure drops towards a well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepletionScaling {
    factors: BTreeMap<usize, Real>,
    min_pressure_drop: Real,
    max_pressure_drop: Real,
}

impl DepletionScaling {
    /// Factor `max(dp, 0) / max_dp` for each cell, where `dp` is the cell
    /// pressure minus the well pressure.
    ///
    /// If no cell has a positive drop there is nothing to scale against and
    /// the result carries no factors.
    pub fn from_pressures(
        well_pressure: Real,
        cell_pressures: &BTreeMap<usize, Real>,
    ) -> CondenserResult<Self> {
        ensure_finite(well_pressure, "well pressure")?;

        let mut drops = BTreeMap::new();
        for (&cell, &p) in cell_pressures {
            ensure_finite(p, "cell pressure")?;
            drops.insert(cell, p - well_pressure);
        }

        if drops.is_empty() {
            return Ok(Self::default());
        }

        let min_pressure_drop = drops.values().copied().fold(Real::INFINITY, Real::min);
        let max_pressure_drop = drops.values().copied().fold(Real::NEG_INFINITY, Real::max);

        let factors = if max_pressure_drop > 0.0 {
            drops
                .into_iter()
                .map(|(cell, dp)| (cell, dp.max(0.0) / max_pressure_drop))
                .collect()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            factors,
            min_pressure_drop,
            max_pressure_drop,
        })
    }

    /// Build directly from precomputed factors.
    pub fn from_factors(factors: BTreeMap<usize, Real>) -> Self {
        Self {
            factors,
            ..Self::default()
        }
    }

    pub fn factor(&self, cell: usize) -> Option<Real> {
        self.factors.get(&cell).copied()
    }

    pub fn min_pressure_drop(&self) -> Real {
        self.min_pressure_drop
    }

    pub fn max_pressure_drop(&self) -> Real {
        self.max_pressure_drop
    }
}

/// Sum of a node's raw transmissibilities to eliminated neighbors.
pub fn lumped_transmissibility(condenser: &TransmissibilityCondenser, node: NodeAddress) -> Real {
    condenser
        .network()
        .neighbors(node)
        .into_iter()
        .filter(|(n, _)| !n.retained)
        .map(|(_, w)| w)
        .sum()
}

fn retained_in(condenser: &TransmissibilityCondenser, domain: Domain) -> Vec<NodeAddress> {
    condenser
        .network()
        .retained_nodes()
        .filter(|n| n.domain == domain)
        .collect()
}

/// Scale every edge from a retained cell of `domain` into the eliminated
/// network by that cell's factor.
///
/// Returns the unscaled lumped transmissibility of each such cell, keyed by
/// cell index. Cells without a factor are left as they are.
pub fn scale_to_eliminated(
    condenser: &mut TransmissibilityCondenser,
    domain: Domain,
    scaling: &DepletionScaling,
) -> CondenserResult<BTreeMap<usize, Real>> {
    let mut original = BTreeMap::new();

    for cell in retained_in(condenser, domain) {
        let star: Vec<_> = condenser
            .network()
            .neighbors(cell)
            .into_iter()
            .filter(|(n, _)| !n.retained)
            .collect();
        if star.is_empty() {
            continue;
        }
        let lumped: Real = star.iter().map(|&(_, w)| w).sum();
        original.insert(cell.index, lumped);

        if let Some(factor) = scaling.factor(cell.index) {
            for (neighbor, _) in star {
                condenser.scale_transmissibility(cell, neighbor, factor)?;
            }
        }
    }

    debug!(%domain, cells = original.len(), "scaled lumped transmissibilities");
    Ok(original)
}

/// Fictitious transmissibility from the eliminated network to `target` as
/// seen from each retained cell of `domain`.
///
/// Cells whose condensed value to `target` is at or below the threshold, or
/// not below their lumped value, are skipped.
pub fn fictitious_transmissibilities(
    condenser: &mut TransmissibilityCondenser,
    domain: Domain,
    target: NodeAddress,
) -> CondenserResult<BTreeMap<usize, Real>> {
    let threshold = condenser.transmissibility_threshold();
    let mut fictitious = BTreeMap::new();

    for cell in retained_in(condenser, domain) {
        if cell == target {
            continue;
        }
        let t_mf = lumped_transmissibility(condenser, cell);
        let t_mt = condenser.condensed_transmissibility(cell, target)?;
        if t_mt > threshold && t_mf > t_mt {
            fictitious.insert(cell.index, t_mf * t_mt / (t_mf - t_mt));
        }
    }
    Ok(fictitious)
}

/// Recombine unscaled lumped values with fictitious values in series.
pub fn effective_transmissibilities(
    original_lumped: &BTreeMap<usize, Real>,
    fictitious: &BTreeMap<usize, Real>,
) -> BTreeMap<usize, Real> {
    fictitious
        .iter()
        .filter_map(|(cell, &t_ft)| {
            original_lumped
                .get(cell)
                .map(|&t_mf| (*cell, series(t_mf, t_ft)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_are_relative_to_largest_drop() {
        let pressures: BTreeMap<usize, Real> = [(1, 150.0), (2, 200.0), (3, 90.0)].into();
        let scaling = DepletionScaling::from_pressures(100.0, &pressures).unwrap();

        assert_eq!(scaling.factor(1), Some(0.5));
        assert_eq!(scaling.factor(2), Some(1.0));
        assert_eq!(scaling.factor(3), Some(0.0));
        assert_eq!(scaling.factor(4), None);
        assert_eq!(scaling.min_pressure_drop(), -10.0);
        assert_eq!(scaling.max_pressure_drop(), 100.0);
    }

    #[test]
    fn no_positive_drop_means_no_factors() {
        let pressures: BTreeMap<usize, Real> = [(1, 80.0)].into();
        let scaling = DepletionScaling::from_pressures(100.0, &pressures).unwrap();
        assert_eq!(scaling.factor(1), None);
        assert_eq!(scaling.max_pressure_drop(), -20.0);
    }

    #[test]
    fn non_finite_pressure_is_rejected() {
        let pressures: BTreeMap<usize, Real> = [(1, Real::NAN)].into();
        assert!(DepletionScaling::from_pressures(100.0, &pressures).is_err());
    }

    #[test]
    fn effective_needs_both_maps() {
        let original: BTreeMap<usize, Real> = [(1, 1.0), (2, 2.0)].into();
        let fictitious: BTreeMap<usize, Real> = [(2, 2.0), (3, 5.0)].into();
        let effective = effective_transmissibilities(&original, &fictitious);
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[&2], 1.0);
    }
}
