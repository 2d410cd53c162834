//! Public condenser entry point.

use std::collections::{BTreeMap, BTreeSet};
use tc_core::{Domain, NodeAddress, Real, TcError, ensure_finite};
use tc_network::ConductanceNetwork;
use tracing::trace;

use crate::eliminate::eliminate;
use crate::error::{CondenserError, CondenserResult};
use crate::ordering::EliminationOrder;
use crate::result::CondensedTransmissibilities;

/// Condenser configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CondenserConfig {
    /// Contributions strictly below this value are ignored on insertion, and
    /// condensed values at or below it are dropped by `condensed_to`.
    pub transmissibility_threshold: Real,
    /// Order in which eliminated nodes are processed
    pub order: EliminationOrder,
}

impl CondenserConfig {
    /// The threshold must be finite and non-negative.
    pub fn validate(&self) -> CondenserResult<()> {
        let threshold = ensure_finite(
            self.transmissibility_threshold,
            "transmissibility threshold",
        )?;
        if threshold < 0.0 {
            return Err(TcError::InvalidArg {
                what: "negative transmissibility threshold",
            }
            .into());
        }
        Ok(())
    }
}

impl Default for CondenserConfig {
    fn default() -> Self {
        Self {
            transmissibility_threshold: 0.0,
            order: EliminationOrder::Canonical,
        }
    }
}

/// Accumulates neighbor transmissibilities and answers condensed queries.
///
/// Raw edges are kept for the lifetime of the condenser. Elimination runs on
/// a copy the first time a condensed value is requested and the result is
/// cached until the next edge is added or scaled.
#[derive(Debug, Clone, Default)]
pub struct TransmissibilityCondenser {
    config: CondenserConfig,
    network: ConductanceNetwork,
    condensed: Option<CondensedTransmissibilities>,
}

impl TransmissibilityCondenser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CondenserConfig) -> CondenserResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &CondenserConfig {
        &self.config
    }

    pub fn transmissibility_threshold(&self) -> Real {
        self.config.transmissibility_threshold
    }

    /// Applies to contributions added after the call. The current threshold
    /// is kept if `threshold` is NaN, infinite or negative.
    pub fn set_transmissibility_threshold(&mut self, threshold: Real) -> CondenserResult<()> {
        let config = CondenserConfig {
            transmissibility_threshold: threshold,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Add a transmissibility between two cells.
    ///
    /// Parallel contributions between the same pair are summed. A valid
    /// contribution below the threshold is dropped without error.
    pub fn add_neighbor_transmissibility(
        &mut self,
        a: NodeAddress,
        b: NodeAddress,
        transmissibility: Real,
    ) -> CondenserResult<()> {
        self.network.check_edge(a, b, transmissibility)?;

        if transmissibility < self.config.transmissibility_threshold {
            trace!(%a, %b, transmissibility, "below threshold, ignored");
            return Ok(());
        }

        self.network.merge_conductance(a, b, transmissibility);
        self.condensed = None;
        Ok(())
    }

    /// Multiply the raw transmissibility between `a` and `b` by `factor`.
    ///
    /// Returns `Ok(false)` if the pair has no edge.
    pub fn scale_transmissibility(
        &mut self,
        a: NodeAddress,
        b: NodeAddress,
        factor: Real,
    ) -> CondenserResult<bool> {
        let scaled = self.network.scale_edge(a, b, factor)?;
        if scaled {
            self.condensed = None;
        }
        Ok(scaled)
    }

    /// Condensed transmissibility between two retained cells.
    ///
    /// Runs elimination over all accumulated edges if anything changed since
    /// the last query. Unconnected pairs yield 0.0. Both endpoints must be
    /// retained cells present in the network.
    pub fn condensed_transmissibility(
        &mut self,
        a: NodeAddress,
        b: NodeAddress,
    ) -> CondenserResult<Real> {
        self.check_retained(a)?;
        self.check_retained(b)?;
        Ok(self.condensed().get(a, b))
    }

    /// Condensed values of every retained cell of `domain` towards `target`
    /// that exceed the threshold, keyed by cell index.
    pub fn condensed_to(
        &mut self,
        target: NodeAddress,
        domain: Domain,
    ) -> CondenserResult<BTreeMap<usize, Real>> {
        self.check_retained(target)?;
        let threshold = self.config.transmissibility_threshold;
        let cells: Vec<_> = self
            .network
            .retained_nodes()
            .filter(|n| n.domain == domain && *n != target)
            .collect();

        let condensed = self.condensed();
        Ok(cells
            .into_iter()
            .filter_map(|cell| {
                let value = condensed.get(cell, target);
                (value > threshold).then_some((cell.index, value))
            })
            .collect())
    }

    /// Cached condensed result, recomputed if stale.
    pub fn condensed(&mut self) -> &CondensedTransmissibilities {
        let network = &self.network;
        let order = self.config.order;
        self.condensed
            .get_or_insert_with(|| eliminate(network.clone(), order))
    }

    /// Run a fresh elimination pass now, replacing any cached result.
    pub fn calculate_condensed_transmissibilities(&mut self) -> &CondensedTransmissibilities {
        let result = eliminate(self.network.clone(), self.config.order);
        self.condensed.insert(result)
    }

    /// Condense without touching the cache.
    ///
    /// Usable through a shared reference once all edges are in.
    pub fn condense(&self) -> CondensedTransmissibilities {
        match &self.condensed {
            Some(cached) => cached.clone(),
            None => eliminate(self.network.clone(), self.config.order),
        }
    }

    /// True if the next query will re-run elimination.
    pub fn is_stale(&self) -> bool {
        self.condensed.is_none()
    }

    /// All retained cells that appear in at least one edge.
    pub fn external_cells(&self) -> BTreeSet<NodeAddress> {
        self.network.retained_nodes().collect()
    }

    /// Raw accumulated network.
    pub fn network(&self) -> &ConductanceNetwork {
        &self.network
    }

    fn check_retained(&self, node: NodeAddress) -> CondenserResult<()> {
        if self.network.is_retained(node) {
            Ok(())
        } else {
            Err(CondenserError::InvalidQuery { address: node })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(i: usize) -> NodeAddress {
        NodeAddress::retained(Domain::PrimaryGrid, i)
    }

    fn int(i: usize) -> NodeAddress {
        NodeAddress::eliminated(Domain::SubGrid, i)
    }

    #[test]
    fn cache_is_invalidated_by_new_edges() {
        let mut c = TransmissibilityCondenser::new();
        c.add_neighbor_transmissibility(ext(0), int(0), 0.5).unwrap();
        c.add_neighbor_transmissibility(int(0), ext(1), 0.5).unwrap();
        assert!(c.is_stale());

        assert_eq!(c.condensed_transmissibility(ext(0), ext(1)).unwrap(), 0.25);
        assert!(!c.is_stale());

        c.add_neighbor_transmissibility(ext(0), ext(1), 1.0).unwrap();
        assert!(c.is_stale());
        assert_eq!(c.condensed_transmissibility(ext(0), ext(1)).unwrap(), 1.25);
    }

    #[test]
    fn raw_edges_survive_elimination() {
        let mut c = TransmissibilityCondenser::new();
        c.add_neighbor_transmissibility(ext(0), int(0), 0.5).unwrap();
        c.add_neighbor_transmissibility(int(0), ext(1), 0.5).unwrap();
        c.calculate_condensed_transmissibilities();

        assert!(c.network().contains(int(0)));
        assert_eq!(c.network().edge_count(), 2);
    }

    #[test]
    fn threshold_drops_small_contributions() {
        let mut c = TransmissibilityCondenser::with_config(CondenserConfig {
            transmissibility_threshold: 1e-9,
            ..CondenserConfig::default()
        })
        .unwrap();
        c.add_neighbor_transmissibility(ext(0), ext(1), 1.0).unwrap();
        c.add_neighbor_transmissibility(ext(0), ext(1), 1e-12).unwrap();
        assert_eq!(c.network().weight(ext(0), ext(1)), 1.0);

        // Validation still runs before the threshold
        assert!(c.add_neighbor_transmissibility(ext(2), ext(2), 1e-12).is_err());
    }

    #[test]
    fn threshold_must_be_finite_and_non_negative() {
        let mut c = TransmissibilityCondenser::new();
        c.set_transmissibility_threshold(1e-9).unwrap();

        let err = c.set_transmissibility_threshold(Real::NAN).unwrap_err();
        assert!(matches!(err, CondenserError::Core(TcError::NonFinite { .. })));
        let err = c.set_transmissibility_threshold(-1.0).unwrap_err();
        assert!(matches!(err, CondenserError::Core(TcError::InvalidArg { .. })));
        assert_eq!(c.transmissibility_threshold(), 1e-9);

        // The kept threshold still filters
        c.add_neighbor_transmissibility(ext(0), ext(1), 1e-12).unwrap();
        assert!(c.network().is_empty());

        let config = CondenserConfig {
            transmissibility_threshold: Real::INFINITY,
            ..CondenserConfig::default()
        };
        assert!(TransmissibilityCondenser::with_config(config).is_err());
    }

    #[test]
    fn queries_require_retained_endpoints() {
        let mut c = TransmissibilityCondenser::new();
        c.add_neighbor_transmissibility(ext(0), int(0), 1.0).unwrap();
        c.add_neighbor_transmissibility(int(0), ext(1), 1.0).unwrap();

        let err = c.condensed_transmissibility(ext(0), int(0)).unwrap_err();
        assert!(matches!(err, CondenserError::InvalidQuery { address } if address == int(0)));

        let err = c.condensed_transmissibility(ext(7), ext(0)).unwrap_err();
        assert!(matches!(err, CondenserError::InvalidQuery { address } if address == ext(7)));
    }

    #[test]
    fn condensed_to_filters_domain_and_threshold() {
        let well = NodeAddress::retained(Domain::Well, 1);
        let mut c = TransmissibilityCondenser::with_config(CondenserConfig {
            transmissibility_threshold: 0.1,
            ..CondenserConfig::default()
        })
        .unwrap();
        c.add_neighbor_transmissibility(ext(3), int(0), 1.0).unwrap();
        c.add_neighbor_transmissibility(ext(4), int(0), 0.1).unwrap();
        c.add_neighbor_transmissibility(int(0), well, 1.0).unwrap();

        let map = c.condensed_to(well, Domain::PrimaryGrid).unwrap();
        // ext4 condenses to 0.1 / 2.1, below the threshold
        let total = 1.0 + 0.1 + 1.0;
        assert_eq!(map.len(), 1);
        assert_eq!(map[&3], 1.0 * 1.0 / total);
    }

    #[test]
    fn scaling_marks_cache_stale() {
        let mut c = TransmissibilityCondenser::new();
        c.add_neighbor_transmissibility(ext(0), ext(1), 2.0).unwrap();
        c.calculate_condensed_transmissibilities();

        assert!(!c.scale_transmissibility(ext(0), ext(5), 0.5).unwrap());
        assert!(!c.is_stale());
        assert!(c.scale_transmissibility(ext(0), ext(1), 0.5).unwrap());
        assert!(c.is_stale());
        assert_eq!(c.condensed_transmissibility(ext(1), ext(0)).unwrap(), 1.0);
    }

    #[test]
    fn condense_does_not_fill_cache() {
        let mut c = TransmissibilityCondenser::new();
        c.add_neighbor_transmissibility(ext(0), int(0), 1.0).unwrap();
        c.add_neighbor_transmissibility(int(0), ext(1), 1.0).unwrap();
        let result = c.condense();
        assert!(c.is_stale());
        assert_eq!(result.get(ext(0), ext(1)), 0.5);
        assert_eq!(c.external_cells().len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_json() {
        let config = CondenserConfig {
            transmissibility_threshold: 1e-9,
            order: EliminationOrder::MinimumDegree,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CondenserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
