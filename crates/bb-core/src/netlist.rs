//! Netlist extraction: group wired endpoints into electrical nets.
//!
//! Every endpoint that appears in a resolvable wire becomes a graph node;
//! every wire an undirected edge. A net is one connected component.
//! The two pins of a component are distinct terminals and are never
//! merged by the component itself.

use crate::model::{Document, Endpoint};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;

/// A set of endpoints joined by wires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Net {
    /// Endpoints in order of first appearance in the wire list.
    pub endpoints: Vec<Endpoint>,
    /// Indices of the wires forming this net.
    pub wires: Vec<usize>,
}

/// Build the endpoint graph for a document. Wires with an endpoint that
/// does not exist are skipped.
pub fn endpoint_graph(doc: &Document) -> UnGraph<Endpoint, usize> {
    let mut graph = UnGraph::new_undirected();
    let mut index: HashMap<Endpoint, NodeIndex> = HashMap::new();

    for (i, conn) in doc.connections.iter().enumerate() {
        if doc.check_endpoint(&conn.from).is_err() || doc.check_endpoint(&conn.to).is_err() {
            continue;
        }
        let a = *index
            .entry(conn.from)
            .or_insert_with(|| graph.add_node(conn.from));
        let b = *index
            .entry(conn.to)
            .or_insert_with(|| graph.add_node(conn.to));
        graph.add_edge(a, b, i);
    }
    graph
}

/// Compute the nets of a document, ordered by first appearance.
#[must_use]
pub fn extract_nets(doc: &Document) -> Vec<Net> {
    let graph = endpoint_graph(doc);
    let mut sets = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut order: Vec<usize> = Vec::new();
    let mut nets: HashMap<usize, Net> = HashMap::new();
    for node in graph.node_indices() {
        let root = sets.find(node.index());
        let net = nets.entry(root).or_insert_with(|| {
            order.push(root);
            Net {
                endpoints: Vec::new(),
                wires: Vec::new(),
            }
        });
        net.endpoints.push(graph[node]);
    }
    for edge in graph.edge_references() {
        let root = sets.find(edge.source().index());
        if let Some(net) = nets.get_mut(&root) {
            net.wires.push(*edge.weight());
        }
    }

    order
        .into_iter()
        .filter_map(|root| nets.remove(&root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::grid::Cell;
    use crate::id::ComponentId;
    use crate::model::{ComponentKind, Connection};
    use pretty_assertions::assert_eq;

    #[test]
    fn series_loop_forms_two_nets() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let bat = doc
            .add_component(&catalog, ComponentKind::Battery, Cell::new(0, 0), 1)
            .unwrap();
        let res = doc
            .add_component(&catalog, ComponentKind::Resistor, Cell::new(5, 0), 2)
            .unwrap();
        let led = doc
            .add_component(&catalog, ComponentKind::Led, Cell::new(10, 0), 3)
            .unwrap();
        let junction = doc.add_custom_point(400.0, 200.0, 4).unwrap();

        doc.connect(Endpoint::pin(bat, 1), Endpoint::pin(res, 0)).unwrap();
        doc.connect(Endpoint::pin(res, 1), Endpoint::custom(junction)).unwrap();
        doc.connect(Endpoint::custom(junction), Endpoint::pin(led, 0)).unwrap();

        let nets = extract_nets(&doc);
        assert_eq!(nets.len(), 2);
        assert_eq!(
            nets[0].endpoints,
            vec![Endpoint::pin(bat, 1), Endpoint::pin(res, 0)]
        );
        assert_eq!(
            nets[1].endpoints,
            vec![
                Endpoint::pin(res, 1),
                Endpoint::custom(junction),
                Endpoint::pin(led, 0)
            ]
        );
        assert_eq!(nets[1].wires, vec![1, 2]);
    }

    #[test]
    fn dangling_wires_are_ignored() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let a = doc
            .add_component(&catalog, ComponentKind::Diode, Cell::new(0, 0), 1)
            .unwrap();
        doc.connections.push(Connection {
            from: Endpoint::pin(a, 0),
            to: Endpoint::pin(ComponentId::intern("ic-77"), 0),
        });
        assert!(extract_nets(&doc).is_empty());
    }
}
