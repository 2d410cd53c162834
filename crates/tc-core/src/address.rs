use core::fmt;

/// Which grid representation owns a cell.
///
/// Declaration order is the ordering used for canonical elimination.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// Coarse simulation grid.
    PrimaryGrid,
    /// Locally refined grid (e.g. a fracture grid).
    SubGrid,
    /// Well connection point.
    Well,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::PrimaryGrid => "PrimaryGrid",
            Domain::SubGrid => "SubGrid",
            Domain::Well => "Well",
        };
        f.write_str(name)
    }
}

/// Identity of a node in a conductance network.
///
/// Equality, hashing and ordering are structural over
/// `(retained, domain, index)` in that order. The index is only unique
/// within its domain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeAddress {
    /// True if the node must survive elimination ("external" cell).
    pub retained: bool,
    pub domain: Domain,
    pub index: usize,
}

impl NodeAddress {
    pub const fn new(retained: bool, domain: Domain, index: usize) -> Self {
        Self {
            retained,
            domain,
            index,
        }
    }

    /// Shorthand for a node that survives elimination.
    pub const fn retained(domain: Domain, index: usize) -> Self {
        Self::new(true, domain, index)
    }

    /// Shorthand for a node folded into its neighbors during elimination.
    pub const fn eliminated(domain: Domain, index: usize) -> Self {
        Self::new(false, domain, index)
    }

    /// The same cell with the retained flag flipped.
    pub const fn flipped(self) -> Self {
        Self::new(!self.retained, self.domain, self.index)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.retained { "ext" } else { "int" };
        write!(f, "{} {}[{}]", tag, self.domain, self.index)
    }
}
