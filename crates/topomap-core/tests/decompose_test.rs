use serde_json::json;
use std::sync::Arc;
use topomap_core::graph::{CoordRef, DataRecord, Entity, Node};
use topomap_core::{
    CoordinateMode, EdgeRow, NodeRow, PushPath, Scene, SceneConfig, SceneInput, push_path,
};

fn path(value: serde_json::Value) -> Vec<CoordRef> {
    serde_json::from_value(value).unwrap()
}

fn scene_with(mode: CoordinateMode, nodes: &[(&str, f64, f64)]) -> Scene {
    let mut scene = Scene::new(SceneConfig {
        mode,
        ..Default::default()
    });
    for &(id, x, y) in nodes {
        scene.add_vertex(&NodeRow::new(id, x, y)).unwrap();
    }
    scene
}

fn edge_ids(scene: &Scene) -> Vec<String> {
    let g = scene.graph();
    g.deep_edges(g.root())
        .map(|e| g.edge(e).unwrap().id().to_string())
        .collect()
}

#[test]
fn two_node_path_creates_one_registered_edge() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 10.0, 0.0)]);
    let created = scene.add_edge_row(&EdgeRow::new(path(json!(["A", "B"]))).with_id("e1"));
    assert_eq!(created.len(), 1);

    let g = scene.graph();
    let root = g.root();
    let e = g.find_edge(root, "e1").unwrap();
    let a = g.node(g.find_node(root, "A").unwrap()).unwrap();
    let b = g.node(g.find_node(root, "B").unwrap()).unwrap();
    assert_eq!(a.out_edges().iter().copied().collect::<Vec<_>>(), vec![e]);
    assert_eq!(b.in_edges().iter().copied().collect::<Vec<_>>(), vec![e]);
    assert!(a.in_edges().is_empty() && b.out_edges().is_empty());

    let data = g.edge(e).unwrap().data().unwrap();
    assert_eq!(data.edge_id, "e1");
    assert_eq!(data.record_index, Some(0));
    assert!(!data.synthetic);
    assert_eq!(scene.vertex_ids()[0].native_ids, vec![Some(0), Some(1)]);
    assert_eq!(scene.hyperedges(), &[vec![e]]);
}

#[test]
fn default_edge_id_joins_the_endpoints() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
    scene.add_edge_row(&EdgeRow::new(path(json!(["A", "B"]))));
    assert_eq!(edge_ids(&scene), vec!["A-B"]);
}

#[test]
fn repeated_edge_id_is_a_no_op() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
    let row = EdgeRow::new(path(json!(["A", "B"]))).with_id("e1");
    assert_eq!(scene.add_edge_row(&row).len(), 1);
    assert!(scene.add_edge_row(&row).is_empty());
    assert_eq!(edge_ids(&scene), vec!["e1"]);
    assert_eq!(scene.hyperedges().len(), 1);
    assert_eq!(scene.vertex_ids().len(), 1);
    assert!(scene.graph().is_consistent());
}

#[test]
fn annotated_waypoint_becomes_a_comment() {
    let mut config = SceneConfig {
        mode: CoordinateMode::Geographic,
        ..Default::default()
    };
    config
        .comments
        .colors
        .insert("red".to_string(), "#f53636".to_string());
    let mut scene = Scene::new(config);

    let raw = path(json!(["A", [5, 5, 0, "note", "red"], "B"]));
    let mut row = EdgeRow::new(raw.clone()).with_id("e1");
    row.layer_name = Some("links".to_string());
    let out = scene
        .update(
            &SceneInput {
                nodes: vec![NodeRow::new("A", 0.0, 0.0), NodeRow::new("B", 10.0, 0.0)],
                edges: vec![row],
            },
            None,
        )
        .unwrap();

    let comments = &scene.comments()["e1"];
    assert_eq!(comments.len(), 1);
    let c = &comments[&1];
    assert_eq!(c.text, "note");
    assert_eq!(c.color, "#f53636");
    assert_eq!(c.coords, [5.0, 5.0]);
    assert_eq!(c.layer_name.as_deref(), Some("links"));

    // The waypoint stays in the middle of the single run.
    let line = &out.lines["root"][0];
    assert_eq!(
        line.geometry.coordinates,
        vec![vec![[0.0, 0.0], [5.0, 5.0], [10.0, 0.0]]]
    );
    let e1 = scene.graph().find_edge(scene.root(), "e1").unwrap();
    let data = scene.graph().edge(e1).unwrap().data().unwrap();
    assert_eq!(data.path, raw);
    assert!(data.sub_path.is_none());
}

#[test]
fn comments_are_dropped_with_an_unresolved_path() {
    let mut scene = scene_with(CoordinateMode::Geographic, &[("A", 0.0, 0.0)]);
    let created =
        scene.add_edge_row(&EdgeRow::new(path(json!(["A", [1, 1, 0, "orphan"], "ghost"]))));
    assert!(created.is_empty());
    assert!(scene.comments().is_empty());
    assert!(scene.hyperedges().is_empty());
}

#[test]
fn comments_survive_a_skipped_edge() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
    scene.add_edge_row(&EdgeRow::new(path(json!(["A", "B"]))).with_id("e1"));
    scene.add_edge_row(
        &EdgeRow::new(path(json!(["A", [1, 1, 0, "late", "#000000"], "B"]))).with_id("e1"),
    );
    assert_eq!(scene.comments()["e1"][&1].color, "#000000");
    assert_eq!(scene.hyperedges().len(), 1);
}

#[test]
fn three_nodes_in_logic_mode_are_segregated() {
    let mut scene = scene_with(
        CoordinateMode::Cartesian,
        &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
    );
    let created = scene.add_edge_row(&EdgeRow::new(path(json!(["A", "B", "C"]))));
    assert_eq!(created.len(), 2);
    assert_eq!(edge_ids(&scene), vec!["A-C", "A-C--1"]);

    let g = scene.graph();
    let first = g.edge(created[0]).unwrap();
    let second = g.edge(created[1]).unwrap();
    assert_eq!(g.node_id(first.source()), Some("A"));
    assert_eq!(g.node_id(first.target()), Some("B"));
    assert_eq!(g.node_id(second.source()), Some("B"));
    assert_eq!(g.node_id(second.target()), Some("C"));

    let (d1, d2) = (first.data().unwrap(), second.data().unwrap());
    assert!(Arc::ptr_eq(&d1.record, &d2.record));
    assert!(d1.synthetic && d2.synthetic);
    assert_eq!(d1.edge_id, "A-C");
    assert_eq!(d2.edge_id, "A-C");
    assert_eq!(d1.sub_path, Some(path(json!(["A", "B"]))));
    assert_eq!(d2.sub_path, Some(path(json!(["B", "C"]))));
    assert_eq!(scene.hyperedges(), &[created]);
}

#[test]
fn removing_the_middle_node_keeps_the_graph_consistent() {
    let mut scene = scene_with(
        CoordinateMode::Cartesian,
        &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
    );
    scene.add_edge_row(&EdgeRow::new(path(json!(["A", "B", "C"]))));

    let g = scene.graph_mut();
    let root = g.root();
    let b = g.find_node(root, "B").unwrap();
    g.remove_node(root, b);

    let a = g.node(g.find_node(root, "A").unwrap()).unwrap();
    let c = g.node(g.find_node(root, "C").unwrap()).unwrap();
    assert!(a.out_edges().is_empty());
    assert!(c.in_edges().is_empty());
    assert!(g.is_consistent());
    assert_eq!(g.deep_edges_count(root), 0);
}

#[test]
fn geographic_mode_keeps_waypoints_and_a_single_edge() {
    let mut scene = scene_with(
        CoordinateMode::Geographic,
        &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
    );
    let created = scene.add_edge_row(&EdgeRow::new(path(json!(["A", [0.5, 1, 0], "B", "C"]))));
    assert_eq!(created.len(), 1);
    assert_eq!(edge_ids(&scene), vec!["A-C"]);
    assert_eq!(
        scene.vertex_ids()[0].native_ids,
        vec![Some(0), None, Some(1), Some(2)]
    );
    let data = scene.graph().edge(created[0]).unwrap().data().unwrap();
    assert_eq!(data.path.len(), 4);
    assert!(!data.synthetic);
}

#[test]
fn malformed_paths_are_dropped() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
    assert!(scene.add_edge_row(&EdgeRow::new(path(json!([[0, 0, 0, "x"], "B"])))).is_empty());
    assert!(scene.add_edge_row(&EdgeRow::new(path(json!(["A", "ghost"])))).is_empty());
    assert!(scene.add_edge_row(&EdgeRow::new(Vec::new())).is_empty());
    assert!(scene.vertex_ids().is_empty());
    assert!(scene.hyperedges().is_empty());
    assert!(scene.comments().is_empty());
}

#[test]
fn unknown_intermediate_nodes_are_skipped() {
    let mut scene = scene_with(
        CoordinateMode::Cartesian,
        &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
    );
    let created = scene.add_edge_row(&EdgeRow::new(path(json!(["A", "ghost", "C"]))));
    assert_eq!(created.len(), 1);
    assert_eq!(scene.vertex_ids()[0].native_ids, vec![Some(0), Some(2)]);
}

#[test]
fn nodes_without_vertex_ids_abandon_the_path() {
    let mut scene = Scene::default();
    let root = scene.root();
    scene.graph_mut().add_node(root, Node::new("X")).unwrap();
    scene.graph_mut().add_node(root, Node::new("Y")).unwrap();
    assert!(scene.add_edge_row(&EdgeRow::new(path(json!(["X", "Y"])))).is_empty());
    assert!(scene.vertex_ids().is_empty());
    assert_eq!(scene.graph().deep_edges_count(root), 0);
}

#[test]
fn cross_namespace_edges_are_owned_by_the_source_namespace() {
    let mut scene = Scene::default();
    scene
        .add_vertex(&NodeRow::new("A", 0.0, 0.0).in_namespace("east"))
        .unwrap();
    scene
        .add_vertex(&NodeRow::new("B", 5.0, 0.0).in_namespace("west"))
        .unwrap();

    let mut row = EdgeRow::new(path(json!(["A", "B"])));
    row.namespace = Some("east".to_string());
    row.target_namespace = Some("west".to_string());
    let created = scene.add_edge_row(&row);
    assert_eq!(created.len(), 1);

    let g = scene.graph();
    let east = scene.find_namespace(Some("east")).unwrap();
    let edge = g.edge(created[0]).unwrap();
    assert_eq!(edge.owner(), east);
    assert!(g.is_inter_graph_edge(created[0]));
    assert!(g.is_consistent());

    let mut row = EdgeRow::new(path(json!(["A", "B"])));
    row.namespace = Some("nowhere".to_string());
    assert!(scene.add_edge_row(&row).is_empty());
}

#[test]
fn vertex_rows_fill_buffer_groups_and_ranges() {
    let mut scene = Scene::default();
    let mut row = NodeRow::new("A", 3.0, 4.0).in_namespace("ns");
    row.group = Some(2);
    let a = scene.add_vertex(&row).unwrap();
    scene
        .add_vertex(&NodeRow::new("B", 5.0, 6.0).in_namespace("ns"))
        .unwrap();

    assert_eq!(scene.buffer().get(0), Some([3.0, 4.0]));
    assert_eq!(scene.buffer().get(1), Some([5.0, 6.0]));
    let ns = scene.find_namespace(Some("ns")).unwrap();
    let g = scene.graph();
    assert_eq!(g.group_counts(ns).and_then(|c| c.get(&2)).copied(), Some(1));
    assert_eq!(g.position_ranges(ns), &[0..2]);
    assert_eq!(g.node(a).unwrap().parent(), Some(ns));

    let again = scene.add_vertex(&row).unwrap();
    assert_eq!(again, a);
    assert_eq!(scene.buffer().len(), 2);
    let g = scene.graph();
    assert_eq!(g.group_counts(ns).and_then(|c| c.get(&2)).copied(), Some(1));
    assert_eq!(g.position_ranges(ns), &[0..2]);
}

#[test]
fn namespace_named_after_a_plain_node_is_rejected() {
    let mut scene = Scene::default();
    scene.add_vertex(&NodeRow::new("core", 0.0, 0.0)).unwrap();
    let err = scene
        .add_vertex(&NodeRow::new("B", 1.0, 1.0).in_namespace("core"))
        .unwrap_err();
    assert!(matches!(
        err,
        topomap_core::Error::Graph(topomap_core::graph::GraphError::NotASubgraph(_))
    ));
    assert_eq!(scene.buffer().len(), 1);
}

#[test]
fn push_path_accepts_a_shared_record() {
    let mut scene = scene_with(CoordinateMode::Cartesian, &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
    let record = Arc::new(DataRecord {
        row_index: Some(7),
        ..Default::default()
    });
    let p = path(json!(["A", "B"]));
    let root = scene.root();
    let created = push_path(
        &mut scene,
        PushPath {
            graph: root,
            target_graph: None,
            path: &p,
            layer: Some(3),
            edge_id: Some("direct"),
            record: record.clone(),
        },
    );
    assert_eq!(created.len(), 1);
    let data = scene.graph().edge(created[0]).unwrap().data().unwrap();
    assert!(Arc::ptr_eq(&data.record, &record));
    assert_eq!(scene.vertex_ids()[0].layer, Some(3));
}
