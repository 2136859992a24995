use bevy::prelude::*;

use super::*;
use crate::curve::{ArcDirection, CurveDefinition};

fn node(id: u32, x: f32, z: f32) -> GraphNode {
    GraphNode {
        id: NodeId(id),
        position: Vec3::new(x, 0.0, z),
    }
}

fn straight(id: u32, from: u32, to: u32) -> GraphEdge {
    GraphEdge {
        id: EdgeId(id),
        from: NodeId(from),
        to: NodeId(to),
        curve: CurveDefinition::Straight,
    }
}

#[test]
fn test_new_graph_resolves_nodes_and_edges() {
    let graph = TrackGraph::new(
        vec![node(0, 0.0, 0.0), node(1, 0.0, 1.0), node(2, 1.0, 1.0)],
        vec![straight(10, 0, 1), straight(11, 1, 2)],
    )
    .expect("valid graph");

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.get_node(NodeId(2)).map(|n| n.position), Some(Vec3::new(1.0, 0.0, 1.0)));
    assert!(graph.get_node(NodeId(7)).is_none());
    assert_eq!(graph.get_edge(EdgeId(11)).map(|e| e.from), Some(NodeId(1)));
    assert_eq!(graph.edges_at_node(NodeId(1)).count(), 2);
    assert!((graph.total_length() - 2.0).abs() < 1e-5);
}

#[test]
fn test_edge_with_missing_node_is_rejected() {
    let err = TrackGraph::new(vec![node(0, 0.0, 0.0)], vec![straight(3, 0, 9)]).unwrap_err();
    assert_eq!(
        err,
        TrackGraphError::InvalidEdge {
            edge: EdgeId(3),
            missing_node: NodeId(9),
        }
    );
    let msg = format!("{err}");
    assert!(msg.contains("edge#3"), "got: {msg}");
    assert!(msg.contains("node#9"), "got: {msg}");
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let err = TrackGraph::new(vec![node(0, 0.0, 0.0), node(0, 1.0, 0.0)], vec![]).unwrap_err();
    assert_eq!(err, TrackGraphError::DuplicateNode(NodeId(0)));

    let err = TrackGraph::new(
        vec![node(0, 0.0, 0.0), node(1, 1.0, 0.0)],
        vec![straight(4, 0, 1), straight(4, 1, 0)],
    )
    .unwrap_err();
    assert_eq!(err, TrackGraphError::DuplicateEdge(EdgeId(4)));
}

#[test]
fn test_empty_graph() {
    let graph = TrackGraph::new(vec![node(0, 0.0, 0.0)], vec![]).expect("valid graph");
    assert!(graph.is_empty());
    assert!(graph.sample_edge(EdgeId(0), 0.5).is_none());
}

#[test]
fn test_sample_edge_uses_resolved_endpoints() {
    let graph = TrackGraph::new(
        vec![node(0, 0.0, 0.0), node(1, 0.0, 2.0)],
        vec![straight(0, 0, 1)],
    )
    .expect("valid graph");
    let s = graph.sample_edge(EdgeId(0), 0.25).expect("edge exists");
    assert!((s.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
    assert_eq!(graph.edge_length(EdgeId(0)), Some(2.0));
}

#[test]
fn test_builder_arc_closes_on_end_node() {
    let mut builder = TrackLayoutBuilder::new(Vec3::ZERO, Vec3::Z);
    builder.straight(0.5);
    let arc = builder.arc(0.371, 45.0, ArcDirection::Clockwise);
    let graph = builder.build().expect("builder graphs are valid");

    let edge = graph.get_edge(arc).expect("arc exists").clone();
    let end = graph.get_node(edge.to).expect("end node").position;
    let at_end = graph.sample_edge(arc, 1.0).expect("arc exists").position;
    assert!((at_end - end).length() < 1e-3, "at_end={at_end} end={end}");
}

#[test]
fn test_builder_full_circle_of_arcs_returns_to_origin() {
    let mut builder = TrackLayoutBuilder::new(Vec3::ZERO, Vec3::X);
    for _ in 0..8 {
        builder.arc(0.5, 45.0, ArcDirection::CounterClockwise);
    }
    assert!(builder.cursor_position().length() < 1e-4);
    assert!((builder.heading() - Vec3::X).length() < 1e-4);
}

#[test]
fn test_builder_graded_straight_keeps_horizontal_tangent() {
    let mut builder = TrackLayoutBuilder::new(Vec3::ZERO, Vec3::Z);
    let ramp = builder.straight_with_rise(1.0, 0.04);
    assert!((builder.cursor_position() - Vec3::new(0.0, 0.04, 1.0)).length() < 1e-6);
    let graph = builder.build().expect("builder graphs are valid");

    let mid = graph.sample_edge(ramp, 0.5).expect("ramp exists");
    assert!((mid.position.y - 0.02).abs() < 1e-6);
    assert!((mid.tangent - Vec3::Z).length() < 1e-6);
    assert_eq!(graph.edge_length(ramp), Some(1.0));
}

#[test]
fn test_builder_jump_to_unknown_node_fails() {
    let mut builder = TrackLayoutBuilder::new(Vec3::ZERO, Vec3::Z);
    builder.straight(1.0);
    assert!(!builder.jump_to(NodeId(42), Vec3::X));
    assert!(builder.jump_to(NodeId(0), Vec3::X));
    assert_eq!(builder.cursor_node(), NodeId(0));
    assert_eq!(builder.heading(), Vec3::X);
}

#[test]
fn test_layout_json_roundtrip_preserves_graph() {
    let mut builder = TrackLayoutBuilder::new(Vec3::new(0.0, 0.9, 0.0), Vec3::Z);
    builder.straight(1.0);
    builder.arc(0.4, 30.0, ArcDirection::Clockwise);
    let graph = builder.build().expect("valid graph");

    let json = TrackLayout::from_graph(&graph)
        .to_json_string()
        .expect("layout serializes");
    let restored = TrackLayout::from_json_str(&json)
        .expect("layout parses")
        .into_graph()
        .expect("layout is valid");

    assert_eq!(restored.all_nodes(), graph.all_nodes());
    assert_eq!(restored.all_edges(), graph.all_edges());
}

#[test]
fn test_layout_json_with_missing_node_fails_to_build() {
    let json = r#"{
        "nodes": [{ "id": 0, "position": [0.0, 0.0, 0.0] }],
        "edges": [{ "id": 0, "from": 0, "to": 1, "curve": { "kind": "straight" } }]
    }"#;
    let layout = TrackLayout::from_json_str(json).expect("json is well formed");
    assert!(matches!(
        TrackGraph::from_layout(layout),
        Err(TrackGraphError::InvalidEdge { .. })
    ));
}

#[test]
fn test_layout_json_arc_format() {
    let json = r#"{
        "nodes": [
            { "id": 0, "position": [0.0, 0.0, 0.0] },
            { "id": 1, "position": [1.0, 0.0, 1.0] }
        ],
        "edges": [{
            "id": 0, "from": 0, "to": 1,
            "curve": { "kind": "arc", "radius": 1.0, "sweep_angle_deg": 90.0, "direction": "clockwise" }
        }]
    }"#;
    let graph = TrackLayout::from_json_str(json)
        .expect("json is well formed")
        .into_graph()
        .expect("valid graph");
    let mid = graph.sample_edge(EdgeId(0), 0.5).expect("edge exists");
    let expected = Vec3::new(
        std::f32::consts::FRAC_1_SQRT_2,
        0.0,
        1.0 - std::f32::consts::FRAC_1_SQRT_2,
    );
    assert!((mid.position - expected).length() < 1e-4, "mid={}", mid.position);
}
