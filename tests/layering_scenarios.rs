use strata_graph::prelude::*;

fn nodes<const K: usize>(ids: [&str; K]) -> impl Iterator<Item = Node> + '_ {
    ids.into_iter().map(Node::bare)
}

#[test]
fn chain_assigns_one_layer_per_node() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["n1", "n2", "n3"]))?
        .add_edges([Edge::between("n1", "n2"), Edge::between("n2", "n3")])?;

    assert_eq!(g.layer_of("n1"), Some(0));
    assert_eq!(g.layer_of("n2"), Some(1));
    assert_eq!(g.layer_of("n3"), Some(2));

    let pred_ids = g.pred_nodes("n3");
    let preds: Vec<&str> = pred_ids.iter().map(NodeId::as_str).collect();
    assert_eq!(preds, ["n2"]);
    let succ_ids = g.succ_nodes("n1");
    let succs: Vec<&str> = succ_ids.iter().map(NodeId::as_str).collect();
    assert_eq!(succs, ["n2"]);
    Ok(())
}

#[test]
fn diamond_places_the_branches_side_by_side() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new().with_mutations(|m| {
        m.add_nodes(nodes(["n1", "n2", "n3", "n4"]));
        m.add_edges([
            Edge::between("n1", "n2"),
            Edge::between("n1", "n3"),
            Edge::between("n2", "n4"),
            Edge::between("n3", "n4"),
        ]);
    })?;

    assert_eq!(g.layer_of("n1"), Some(0));
    assert_eq!(g.layer_of("n2"), Some(1));
    assert_eq!(g.layer_of("n3"), Some(1));
    assert_eq!(g.layer_of("n4"), Some(2));
    assert_eq!(g.num_layers(), 3);
    Ok(())
}

#[test]
fn edge_removal_drops_the_orphan_to_layer_zero() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["n1", "n2", "n3"]))?
        .add_edges([Edge::between("n1", "n2"), Edge::between("n2", "n3")])?;

    let cut = g.remove_edge("n2-n3")?;
    assert_eq!(cut.layer_of("n3"), Some(0));
    assert_eq!(cut.num_layers(), 2);

    // re-attach n3 under n1: it climbs to layer 1, n2 keeps its parent and
    // its seat
    let back = cut.add_edge(Edge::between("n1", "n3"))?;
    assert_eq!(back.layer_of("n3"), Some(1));
    assert_eq!(back.layer_of("n2"), Some(1));
    assert_eq!(back.layer_of("n1"), Some(0));
    Ok(())
}

#[test]
fn removing_a_middle_node_detaches_both_sides() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["n1", "n2", "n3"]))?
        .add_edges([Edge::between("n1", "n2"), Edge::between("n2", "n3")])?;

    let cut = g.remove_node("n2")?;
    assert!(!cut.has_node("n2"));
    assert!(!cut.has_edge("n1-n2"));
    assert!(!cut.has_edge("n2-n3"));
    assert!(cut.succ_nodes("n1").is_empty());
    assert!(cut.pred_nodes("n3").is_empty());
    assert_eq!(cut.layer_of("n3"), Some(0));
    assert_eq!(cut.num_layers(), 1);
    Ok(())
}

#[test]
fn roots_of_a_freshly_built_graph_sit_at_zero() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new().with_mutations(|m| {
        m.add_nodes(nodes(["r1", "r2", "a", "b"]));
        m.add_edges([
            Edge::between("r1", "a"),
            Edge::between("r2", "a"),
            Edge::between("a", "b"),
        ]);
    })?;
    assert_eq!(g.layer_of("r1"), Some(0));
    assert_eq!(g.layer_of("r2"), Some(0));
    assert_eq!(g.layer_of("a"), Some(1));
    assert_eq!(g.layer_of("b"), Some(2));
    Ok(())
}

#[test]
fn parents_sit_one_past_their_highest_parent() -> Result<(), GraphError> {
    // n5 hangs off both a root and a deep node; it must clear the deep one
    let g = Graph::<(), ()>::new().with_mutations(|m| {
        m.add_nodes(nodes(["a", "b", "c", "d", "n5"]));
        m.add_edges([
            Edge::between("a", "b"),
            Edge::between("b", "c"),
            Edge::between("c", "d"),
            Edge::between("a", "n5"),
            Edge::between("c", "n5"),
        ]);
    })?;
    assert_eq!(g.layer_of("c"), Some(2));
    assert_eq!(g.layer_of("n5"), Some(3));
    Ok(())
}

#[test]
fn layer_records_agree_with_layer_of() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["n1", "n2", "n3"]))?
        .add_edges([Edge::between("n1", "n2"), Edge::between("n2", "n3")])?;

    assert_eq!(g.layer_list().len(), 3);
    for (position, layer_id) in g.layer_list().iter().enumerate() {
        let layer = g.layer(*layer_id).expect("listed layer exists");
        assert_eq!(layer.index(), position);
        assert!(!layer.is_empty());
        for node in layer.nodes() {
            assert_eq!(g.layer_of(node.as_str()), Some(position));
            assert_eq!(g.layer_map().get(node.as_str()), Some(layer_id));
        }
    }
    Ok(())
}

#[test]
fn layer_ids_stay_stable_across_compaction() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["a", "b", "c"]))?
        .add_edges([Edge::between("a", "b"), Edge::between("b", "c")])?;
    let top_id = g.layer_id_of("c").expect("c is placed");

    // removing b collapses the middle; c falls to 0 and the old top layer is
    // dropped, but until then its id never changed
    let cut = g.remove_node("b")?;
    assert_eq!(cut.layer_of("c"), Some(0));
    assert_eq!(g.layer_id_of("c"), Some(top_id));
    Ok(())
}

#[test]
fn ported_edges_layer_like_plain_ones() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new().with_mutations(|m| {
        m.add_nodes(nodes(["a", "b"]));
        m.add_edge(Edge::with_ports("a", Some("out"), "b", Some("in"), ()));
        m.add_edge(Edge::with_ports("a", Some("aux"), "b", None::<&str>, ()));
    })?;
    assert_eq!(g.num_edges(), 2);
    assert!(g.has_edge("a.out-b.in"));
    assert!(g.has_edge("a.aux-b"));
    assert_eq!(g.layer_of("b"), Some(1));
    // two parallel port edges still mean one predecessor node
    assert_eq!(g.pred_nodes("b").len(), 1);
    assert_eq!(g.pred_edges("b").count(), 2);
    Ok(())
}

#[test]
fn with_mutations_mixes_all_four_change_kinds() -> Result<(), GraphError> {
    let g = Graph::<(), ()>::new()
        .add_nodes(nodes(["a", "b", "c"]))?
        .add_edges([Edge::between("a", "b"), Edge::between("b", "c")])?;

    let next = g.with_mutations(|m| {
        m.add_node(Node::bare("d"));
        m.remove_node("c");
        m.add_edge(Edge::between("b", "d"));
        m.remove_edge("a-b");
    })?;

    assert!(next.has_node("d"));
    assert!(!next.has_node("c"));
    assert_eq!(next.layer_of("b"), Some(0));
    assert_eq!(next.layer_of("d"), Some(1));
    assert_eq!(next.layer_of("a"), Some(0));
    assert_eq!(next.num_edges(), 1);
    Ok(())
}
