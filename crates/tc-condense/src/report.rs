//! Plain-text listings of raw and condensed networks.

use std::fmt::Write;
use tc_network::ConductanceNetwork;

use crate::result::CondensedTransmissibilities;

/// One line per raw edge, in address order.
pub fn neighbor_report(network: &ConductanceNetwork) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Neighbor transmissibilities: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );
    for (a, b, w) in network.edges() {
        let _ = writeln!(out, "  {a} -> {b} : {w:.6e}");
    }
    out
}

/// One line per condensed pair, followed by retained nodes left unconnected.
pub fn condensed_report(result: &CondensedTransmissibilities) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Condensed transmissibilities: {} retained nodes, {} pairs",
        result.retained_nodes().len(),
        result.len()
    );
    for (a, b, w) in result.iter() {
        let _ = writeln!(out, "  {a} -> {b} : {w:.6e}");
    }
    for &node in result.retained_nodes() {
        if result.row(node).next().is_none() {
            let _ = writeln!(out, "  {node} : unconnected");
        }
    }
    out
}
