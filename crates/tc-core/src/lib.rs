//! tc-core: stable foundation for the transmissibility condenser.
//!
//! Contains:
//! - address (node addresses across grid domains)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod address;
pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use address::{Domain, NodeAddress};
pub use error::{TcError, TcResult};
pub use numeric::*;
