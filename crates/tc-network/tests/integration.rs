//! Integration tests for tc-network.

use tc_core::{Domain, NodeAddress, TcError};
use tc_network::{ConductanceNetwork, IndexMap, NetworkError};

fn matrix(i: usize) -> NodeAddress {
    NodeAddress::retained(Domain::PrimaryGrid, i)
}

fn fracture(i: usize) -> NodeAddress {
    NodeAddress::eliminated(Domain::SubGrid, i)
}

const WELL: NodeAddress = NodeAddress::retained(Domain::Well, 1);

#[test]
fn build_fracture_patch() {
    // Two matrix cells feed a 2-cell fracture strip that reaches the well:
    //   M0 - F0 - F1 - W
    //   M1 - F1
    let mut net = ConductanceNetwork::new();
    net.add_edge(matrix(0), fracture(0), 0.3).unwrap();
    net.add_edge(matrix(1), fracture(1), 0.2).unwrap();
    net.add_edge(fracture(0), fracture(1), 1.5).unwrap();
    net.add_edge(WELL, fracture(1), 4.0).unwrap();

    assert_eq!(net.node_count(), 5);
    assert_eq!(net.edge_count(), 4);
    assert_eq!(net.degree(fracture(1)), 3);
    assert_eq!(
        net.retained_nodes().collect::<Vec<_>>(),
        vec![matrix(0), matrix(1), WELL]
    );

    let map = IndexMap::from_network(&net);
    assert_eq!(map.retained_count(), 3);
    assert_eq!(map.index_of(fracture(0)), Some(3));
    assert_eq!(map.index_of(fracture(1)), Some(4));
}

#[test]
fn same_cell_cannot_change_flag() {
    let mut net = ConductanceNetwork::new();
    net.add_edge(matrix(0), fracture(0), 1.0).unwrap();

    let err = net.add_edge(fracture(0).flipped(), WELL, 1.0).unwrap_err();
    assert_eq!(
        err,
        NetworkError::RetainedConflict {
            node: fracture(0).flipped(),
            existing: fracture(0),
        }
    );

    // Both flags of one cell in a single edge
    let err = net.add_edge(matrix(5), matrix(5).flipped(), 1.0).unwrap_err();
    assert!(matches!(err, NetworkError::RetainedConflict { .. }));
}

#[test]
fn errors_convert_to_core_error() {
    let mut net = ConductanceNetwork::new();
    let err: TcError = net.add_edge(matrix(0), matrix(0), 1.0).unwrap_err().into();
    assert!(matches!(err, TcError::InvalidArg { what: "self-loop" }));
}

#[test]
fn removing_every_node_empties_network() {
    let mut net = ConductanceNetwork::new();
    net.add_edge(matrix(0), fracture(0), 1.0).unwrap();
    net.add_edge(fracture(0), WELL, 1.0).unwrap();

    for node in net.all_nodes() {
        net.remove_node(node);
    }
    assert!(net.is_empty());
    assert_eq!(net.edge_count(), 0);
}
