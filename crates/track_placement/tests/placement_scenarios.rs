//! End-to-end placement scenarios over authored layouts.
//!
//! - nearest point on a straight piece
//! - arc sampling closes on the declared end node
//! - rolling stock sits on the rail top after scaling
//! - oversized models are scaled down to OO gauge
//! - a full commit session over a JSON-authored oval
//!
//! Run: cargo test -p track_placement --test placement_scenarios

use std::sync::Arc;

use bevy::prelude::*;

use track_placement::curve::arc_end_point;
use track_placement::track_graph::{GraphEdge, GraphNode};
use track_placement::{
    align_to_surface, find_nearest, ArcDirection, CurveDefinition, EdgeId, ForwardAxis,
    ModelBounds, ModelContext, NodeId, PlacementCoordinator, PlacementOutcome, PlacementParams,
    ScaleClassifier, ScalePolicy, TrackGraph, TrackLayout, TrackLayoutBuilder,
};

// ---------------------------------------------------------------------------
// Locating
// ---------------------------------------------------------------------------

#[test]
fn test_nearest_point_on_straight_piece() {
    let graph = TrackGraph::new(
        vec![
            GraphNode { id: NodeId(0), position: Vec3::ZERO },
            GraphNode { id: NodeId(1), position: Vec3::new(0.0, 0.0, 1.0) },
        ],
        vec![GraphEdge {
            id: EdgeId(0),
            from: NodeId(0),
            to: NodeId(1),
            curve: CurveDefinition::Straight,
        }],
    )
    .expect("valid graph");

    let info = find_nearest(&graph, Vec3::new(0.01, 0.0, 0.5), 20).expect("one edge");
    assert!((info.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
    assert!((info.distance - 0.01).abs() < 1e-5);
    assert!((info.forward - Vec3::Z).length() < 1e-5);
    assert_eq!(info.edge_id, EdgeId(0));
}

// ---------------------------------------------------------------------------
// Curve sampling
// ---------------------------------------------------------------------------

#[test]
fn test_arc_reaches_declared_end_node() {
    let start = Vec3::new(0.2, 0.0, -0.4);
    let (end, _) = arc_end_point(start, Vec3::Z, 0.371, 45.0, ArcDirection::Clockwise, 0.0);

    let graph = TrackGraph::new(
        vec![
            GraphNode { id: NodeId(0), position: start },
            GraphNode { id: NodeId(1), position: end },
        ],
        vec![GraphEdge {
            id: EdgeId(7),
            from: NodeId(0),
            to: NodeId(1),
            curve: CurveDefinition::Arc {
                radius: 0.371,
                sweep_angle_deg: 45.0,
                direction: ArcDirection::Clockwise,
            },
        }],
    )
    .expect("valid graph");

    let first = graph.sample_edge(EdgeId(7), 0.0).expect("edge exists");
    let last = graph.sample_edge(EdgeId(7), 1.0).expect("edge exists");
    assert!((first.position - start).length() < 1e-5);
    assert!((last.position - end).length() < 1e-3, "missed end node by {}", (last.position - end).length());
    assert!((first.tangent - Vec3::Z).length() < 1e-4);

    let length = graph.edge_length(EdgeId(7)).expect("edge exists");
    let expected = 0.371 * 45f32.to_radians();
    assert!((length - expected).abs() < 1e-4, "length={length}");
}

// ---------------------------------------------------------------------------
// Vertical alignment and scale
// ---------------------------------------------------------------------------

#[test]
fn test_scaled_model_rests_on_rail_top() {
    let bounds = ModelBounds::from_corners(Vec3::new(-0.1, -0.02, -0.3), Vec3::new(0.1, 0.2, 0.3));
    let aligned = align_to_surface(&bounds, 0.12, 0.958, 0.0);
    assert!((aligned.final_y - 0.9604).abs() < 1e-6, "final_y={}", aligned.final_y);
    assert!((aligned.bottom_y() - 0.958).abs() < 1e-6);
}

#[test]
fn test_oversized_model_scaled_to_oo_gauge() {
    let bounds = ModelBounds::from_corners(Vec3::new(-0.3, 0.0, -0.05), Vec3::new(0.3, 0.1, 0.05));
    let classifier = ScaleClassifier {
        policy: ScalePolicy::AbsoluteSize,
        ..Default::default()
    };
    let result = classifier.classify(&bounds, None);
    assert!((result.scale_factor - 0.0583).abs() < 1e-4, "scale={}", result.scale_factor);
    assert!(result.changes_scale());
}

// ---------------------------------------------------------------------------
// Full session over an authored layout
// ---------------------------------------------------------------------------

fn oval_layout() -> TrackLayout {
    let mut builder = TrackLayoutBuilder::new(Vec3::new(0.0, 0.958, 0.0), Vec3::Z);
    builder.straight(1.0);
    builder.arc(0.371, 180.0, ArcDirection::Clockwise);
    builder.straight(1.0);
    builder.arc(0.371, 180.0, ArcDirection::Clockwise);
    let graph = builder.build().expect("valid oval");
    TrackLayout::from_graph(&graph)
}

#[test]
fn test_session_over_json_layout() {
    let json = oval_layout().to_json_string().expect("serializable");
    let layout = TrackLayout::from_json_str(&json).expect("parses back");
    let graph = Arc::new(TrackGraph::from_layout(layout).expect("valid graph"));
    assert_eq!(graph.edge_count(), 4);

    let params = PlacementParams::from_json_str(r#"{ "rail_top_y": 0.958 }"#).expect("valid params");
    let bounds = ModelBounds::from_corners(Vec3::new(-0.1, -0.02, -0.3), Vec3::new(0.1, 0.2, 0.3));
    let scale = ScaleClassifier::from_params(&params).classify(&bounds, None).scale_factor;

    let mut coordinator = PlacementCoordinator::with_graph(graph, params);
    assert!(coordinator.start_placement(ModelContext::new(Some(bounds), scale, ForwardAxis::NegX)));

    // Far side of the oval, heading back along -Z.
    let far_x = -2.0 * 0.371;
    let preview = coordinator
        .update(Vec3::new(far_x - 0.01, 0.0, 0.5))
        .expect("track under pointer");
    assert!(preview.is_valid);
    assert_eq!(preview.edge_id(), Some(EdgeId(2)));
    assert!((preview.position.x - far_x).abs() < 1e-3);

    // NegX forward axis rotates the model a further quarter turn.
    let model_forward = preview.rotation() * Vec3::NEG_X;
    assert!((model_forward - Vec3::NEG_Z).length() < 1e-3, "forward={model_forward}");

    let committed = coordinator.commit().expect("valid preview");
    assert_eq!(coordinator.finish(), Some(PlacementOutcome::Committed(committed)));
}

#[test]
fn test_session_rejects_placement_off_track() {
    let graph = Arc::new(oval_layout().into_graph().expect("valid graph"));
    let mut coordinator = PlacementCoordinator::with_graph(graph, PlacementParams::default());
    coordinator.start_placement(ModelContext::default());

    let preview = coordinator.update(Vec3::new(-0.371, 0.0, 0.5)).expect("track exists");
    assert!(!preview.is_valid, "centre of the oval is off track");
    assert!(coordinator.commit().is_none());

    assert!(coordinator.cancel());
    assert_eq!(coordinator.finish(), Some(PlacementOutcome::Cancelled));
}
