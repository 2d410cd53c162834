//! tc-network: conductance network layer for the transmissibility condenser.
//!
//! Provides:
//! - A sparse undirected weighted network keyed by node address
//! - Edge validation (self-loops, negative or non-finite weights, flag conflicts)
//! - Stable contiguous indexing for dense matrix assembly
//!
//! # Example
//!
//! ```
//! use tc_core::{Domain, NodeAddress};
//! use tc_network::ConductanceNetwork;
//!
//! let a = NodeAddress::retained(Domain::PrimaryGrid, 0);
//! let x = NodeAddress::eliminated(Domain::SubGrid, 0);
//!
//! let mut network = ConductanceNetwork::new();
//! network.add_edge(a, x, 0.5).unwrap();
//! network.add_edge(x, a, 0.25).unwrap();
//!
//! assert_eq!(network.weight(a, x), 0.75);
//! assert_eq!(network.edge_count(), 1);
//! ```

pub mod error;
pub mod indexing;
pub mod network;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use error::{NetworkError, NetworkResult};
pub use indexing::IndexMap;
pub use network::ConductanceNetwork;
