//! Property tests for the trace store and canonical graph builder.

use algofresco::{
    Annotations, BinaryNode, CanonicalGraph, Graph, GraphHighlight, GraphVisualizer, Tracer,
    Visualizer, LATEST,
};
use proptest::prelude::*;

fn arb_tree() -> impl Strategy<Value = BinaryNode<u8>> {
    let leaf = any::<u8>().prop_map(BinaryNode::new);
    leaf.prop_recursive(6, 64, 2, |inner| {
        (any::<u8>(), proptest::option::of(inner.clone()), proptest::option::of(inner)).prop_map(
            |(val, left, right)| BinaryNode {
                val,
                left: left.map(Box::new),
                right: right.map(Box::new),
            },
        )
    })
}

fn count_nodes(node: &BinaryNode<u8>) -> usize {
    1 + node.left.as_deref().map_or(0, count_nodes) + node.right.as_deref().map_or(0, count_nodes)
}

proptest! {
    #[test]
    fn prop_step_count_matches_captures(values in prop::collection::vec(any::<i32>(), 0..40)) {
        let mut tracer = Tracer::new();
        let mut list = Vec::new();
        for (i, v) in values.iter().enumerate() {
            list.push(*v);
            prop_assert_eq!(tracer.capture(&list, Annotations::new()), i);
        }
        prop_assert_eq!(tracer.len(), values.len());
    }

    #[test]
    fn prop_snapshots_isolated_from_mutation(values in prop::collection::vec(any::<i32>(), 1..40)) {
        let mut tracer = Tracer::new();
        let mut list = Vec::new();
        for v in &values {
            list.push(*v);
            tracer.capture(&list, Annotations::new());
        }
        list.clear();

        for i in 0..values.len() {
            let entry = tracer.get_snapshot(i as isize).unwrap().unwrap();
            prop_assert_eq!(entry.state.as_slice(), &values[..=i]);
            prop_assert_eq!(entry.step(), i);
        }
    }

    #[test]
    fn prop_latest_is_last_step(len in 1usize..30) {
        let mut tracer = Tracer::new();
        for i in 0..len {
            tracer.capture(&i, Annotations::new());
        }
        let latest = tracer.get_snapshot(LATEST).unwrap().unwrap();
        let last = tracer.get_snapshot(len as isize - 1).unwrap().unwrap();
        prop_assert_eq!(latest, last);
        prop_assert_eq!(tracer.get_snapshot(LATEST).unwrap().unwrap(), latest);
    }

    #[test]
    fn prop_out_of_range_steps_fail(len in 1usize..20, past in 0isize..10) {
        let mut tracer = Tracer::new();
        for i in 0..len {
            tracer.capture(&i, Annotations::new());
        }
        prop_assert!(tracer.get_snapshot(len as isize + past).is_err());
        prop_assert!(tracer.get_snapshot(-2 - past).is_err());
    }

    #[test]
    fn prop_canonical_graph_is_a_tree(tree in arb_tree()) {
        let graph = CanonicalGraph::from_tree(&tree);
        let n = count_nodes(&tree);

        prop_assert_eq!(graph.node_count(), n);
        prop_assert_eq!(graph.edge_count(), n - 1);
        let root_label = tree.val.to_string();
        prop_assert_eq!(graph.label(0), Some(root_label.as_str()));
        for (id, node) in graph.nodes.iter().enumerate() {
            prop_assert_eq!(node.id, id);
        }
        // Every non-root node has exactly one parent, and parents precede children.
        let mut parents = vec![0usize; n];
        for &(parent, child) in &graph.edges {
            prop_assert!(parent < child);
            parents[child] += 1;
        }
        prop_assert_eq!(parents[0], 0);
        prop_assert!(parents[1..].iter().all(|&p| p == 1));
        prop_assert_eq!(CanonicalGraph::from_tree(&tree), graph);
    }

    #[test]
    fn prop_edge_highlight_ignores_orientation(u in 0i32..50, v in 50i32..100, flip in any::<bool>()) {
        let mut g = Graph::new();
        if flip { g.add_edge(v, u) } else { g.add_edge(u, v) }
        let mut tracer = Tracer::new();
        tracer.capture(&g, Annotations::new());
        let vis = GraphVisualizer::new(&tracer);
        let edge_highlight = vis.render_config().palette.edge_highlight.clone();

        for highlight in [GraphHighlight::new().edges([(u, v)]), GraphHighlight::new().edges([(v, u)])] {
            let scene = vis.display_snapshot(0, &highlight, None).unwrap().unwrap();
            let graph = scene.graph.unwrap();
            prop_assert_eq!(&graph.edges[0].color, &edge_highlight);
        }
    }
}
