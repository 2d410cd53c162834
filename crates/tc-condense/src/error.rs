//! Error types for condenser operations.

use tc_core::{NodeAddress, TcError};
use tc_network::NetworkError;
use thiserror::Error;

/// Errors reported by the condenser. Each is a caller contract violation
/// except `Numeric`, which only the dense reference path can produce.
#[derive(Error, Debug)]
pub enum CondenserError {
    #[error("Invalid edge: {0}")]
    InvalidEdge(#[from] NetworkError),

    #[error("Invalid query: {address} is not a retained node of this network")]
    InvalidQuery { address: NodeAddress },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error(transparent)]
    Core(#[from] TcError),
}

pub type CondenserResult<T> = Result<T, CondenserError>;

impl From<CondenserError> for TcError {
    fn from(e: CondenserError) -> Self {
        match e {
            CondenserError::InvalidEdge(err) => err.into(),
            CondenserError::InvalidQuery { .. } => TcError::InvalidArg {
                what: "query endpoint",
            },
            CondenserError::Numeric { .. } => TcError::InvalidArg { what: "numeric" },
            CondenserError::Core(err) => err,
        }
    }
}
