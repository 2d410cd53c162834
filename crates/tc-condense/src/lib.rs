//! Transmissibility condensation for multi-grid flow networks.
//!
//! Cells from a coarse grid, a refined sub-grid and a well are joined by
//! transmissibility edges. Cells flagged as eliminated are folded into their
//! neighbors by sequential star-mesh elimination (a Schur complement of the
//! network Laplacian), leaving the equivalent transmissibility between every
//! pair of retained cells.
//!
//! # Example
//!
//! ```
//! use tc_condense::TransmissibilityCondenser;
//! use tc_core::{Domain, NodeAddress};
//!
//! let a = NodeAddress::retained(Domain::PrimaryGrid, 1);
//! let x = NodeAddress::eliminated(Domain::SubGrid, 1);
//! let b = NodeAddress::retained(Domain::PrimaryGrid, 2);
//!
//! let mut condenser = TransmissibilityCondenser::new();
//! condenser.add_neighbor_transmissibility(a, x, 0.5).unwrap();
//! condenser.add_neighbor_transmissibility(x, b, 0.5).unwrap();
//!
//! assert_eq!(condenser.condensed_transmissibility(a, b).unwrap(), 0.25);
//! ```

pub mod batch;
pub mod condenser;
pub mod depletion;
pub mod eliminate;
pub mod error;
pub mod ordering;
pub mod reference;
pub mod report;
pub mod result;

pub use batch::{condense_all, condense_networks};
pub use condenser::{CondenserConfig, TransmissibilityCondenser};
pub use depletion::DepletionScaling;
pub use eliminate::{EliminationStats, eliminate};
pub use error::{CondenserError, CondenserResult};
pub use ordering::EliminationOrder;
pub use reference::dense_condense;
pub use result::CondensedTransmissibilities;
