//! Network-specific error types.
//!
//! Every variant is a rejected edge contribution; the network is left
//! unchanged when one is returned.

use tc_core::{NodeAddress, TcError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Both endpoints are the same node.
    #[error("Edge connects {node} to itself")]
    SelfLoop { node: NodeAddress },

    /// Transmissibility below zero.
    #[error("Edge {a} - {b} has negative weight {weight}")]
    NegativeWeight {
        a: NodeAddress,
        b: NodeAddress,
        weight: f64,
    },

    /// NaN or infinite transmissibility.
    #[error("Edge {a} - {b} has non-finite weight {weight}")]
    NonFiniteWeight {
        a: NodeAddress,
        b: NodeAddress,
        weight: f64,
    },

    /// The cell is already in the network with the opposite retained flag.
    #[error("{node} was first added as {existing}")]
    RetainedConflict {
        node: NodeAddress,
        existing: NodeAddress,
    },

    /// Scale factor must be finite and non-negative.
    #[error("Edge {a} - {b} cannot be scaled by {factor}")]
    InvalidScale {
        a: NodeAddress,
        b: NodeAddress,
        factor: f64,
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl From<NetworkError> for TcError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::NonFiniteWeight { weight, .. } => TcError::NonFinite {
                what: "edge weight",
                value: weight,
            },
            NetworkError::SelfLoop { .. } => TcError::InvalidArg { what: "self-loop" },
            NetworkError::NegativeWeight { .. } => TcError::InvalidArg {
                what: "negative weight",
            },
            NetworkError::RetainedConflict { .. } => TcError::Invariant {
                what: "retained flag fixed at first mention",
            },
            NetworkError::InvalidScale { .. } => TcError::InvalidArg {
                what: "scale factor",
            },
        }
    }
}
