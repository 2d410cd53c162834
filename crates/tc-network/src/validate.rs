//! Edge validation logic.

use std::collections::BTreeMap;
use tc_core::{NodeAddress, Real};

use crate::error::{NetworkError, NetworkResult};

/// Validate a single edge contribution against the current adjacency.
pub(crate) fn validate_edge(
    adjacency: &BTreeMap<NodeAddress, BTreeMap<NodeAddress, Real>>,
    a: NodeAddress,
    b: NodeAddress,
    weight: Real,
) -> NetworkResult<()> {
    if a == b {
        return Err(NetworkError::SelfLoop { node: a });
    }

    // NaN fails both comparisons below, so check finiteness first
    if !weight.is_finite() {
        return Err(NetworkError::NonFiniteWeight { a, b, weight });
    }
    if weight < 0.0 {
        return Err(NetworkError::NegativeWeight { a, b, weight });
    }

    // Retained flag is fixed at first mention
    if a == b.flipped() {
        return Err(NetworkError::RetainedConflict { node: b, existing: a });
    }
    for node in [a, b] {
        let existing = node.flipped();
        if adjacency.contains_key(&existing) {
            return Err(NetworkError::RetainedConflict { node, existing });
        }
    }

    // Total conductance at each endpoint must stay finite. This bounds the
    // accumulated edge weight and every star total seen during elimination.
    for node in [a, b] {
        let total = total_conductance(adjacency, node) + weight;
        if !total.is_finite() {
            return Err(NetworkError::NonFiniteWeight {
                a,
                b,
                weight: total,
            });
        }
    }

    Ok(())
}

/// Sum of all edge weights incident to `node`, 0.0 if absent.
pub(crate) fn total_conductance(
    adjacency: &BTreeMap<NodeAddress, BTreeMap<NodeAddress, Real>>,
    node: NodeAddress,
) -> Real {
    adjacency.get(&node).map_or(0.0, |m| m.values().sum())
}

/// Validate a multiplicative scale factor for an existing edge.
pub(crate) fn validate_scale(a: NodeAddress, b: NodeAddress, factor: Real) -> NetworkResult<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidScale { a, b, factor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::Domain;

    fn empty() -> BTreeMap<NodeAddress, BTreeMap<NodeAddress, Real>> {
        BTreeMap::new()
    }

    #[test]
    fn rejects_self_loop() {
        let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
        let err = validate_edge(&empty(), a, a, 1.0).unwrap_err();
        assert_eq!(err, NetworkError::SelfLoop { node: a });
    }

    #[test]
    fn rejects_nan_and_negative() {
        let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
        let b = NodeAddress::eliminated(Domain::SubGrid, 1);
        assert!(matches!(
            validate_edge(&empty(), a, b, Real::NAN),
            Err(NetworkError::NonFiniteWeight { .. })
        ));
        assert!(matches!(
            validate_edge(&empty(), a, b, -1e-12),
            Err(NetworkError::NegativeWeight { .. })
        ));
        assert!(validate_edge(&empty(), a, b, 0.0).is_ok());
    }

    #[test]
    fn rejects_flipped_flag() {
        let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
        let b = NodeAddress::eliminated(Domain::SubGrid, 1);
        let mut adjacency = empty();
        adjacency.entry(a).or_default().insert(b, 1.0);
        adjacency.entry(b).or_default().insert(a, 1.0);

        let c = NodeAddress::retained(Domain::Well, 0);
        let err = validate_edge(&adjacency, c, a.flipped(), 1.0).unwrap_err();
        assert_eq!(
            err,
            NetworkError::RetainedConflict {
                node: a.flipped(),
                existing: a
            }
        );
    }

    #[test]
    fn rejects_overflowing_accumulation() {
        let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
        let b = NodeAddress::eliminated(Domain::SubGrid, 1);
        let c = NodeAddress::retained(Domain::Well, 0);
        let mut adjacency = empty();
        adjacency.entry(a).or_default().insert(b, Real::MAX);
        adjacency.entry(b).or_default().insert(a, Real::MAX);

        // Same edge again
        assert!(matches!(
            validate_edge(&adjacency, a, b, Real::MAX),
            Err(NetworkError::NonFiniteWeight { weight, .. }) if weight.is_infinite()
        ));
        // New edge whose endpoint is already saturated
        assert!(matches!(
            validate_edge(&adjacency, b, c, Real::MAX),
            Err(NetworkError::NonFiniteWeight { .. })
        ));
        assert!(validate_edge(&adjacency, a, b, 0.0).is_ok());
    }

    #[test]
    fn scale_factor_bounds() {
        let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
        let b = NodeAddress::eliminated(Domain::SubGrid, 1);
        assert!(validate_scale(a, b, 0.0).is_ok());
        assert!(validate_scale(a, b, 2.5).is_ok());
        assert!(validate_scale(a, b, -0.1).is_err());
        assert!(validate_scale(a, b, Real::INFINITY).is_err());
    }
}
