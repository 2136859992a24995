//! Nearest-edge search over a [`TrackGraph`].
//!
//! Brute force: every edge is sampled at a fixed parametric density and the
//! closest sample wins. Cost is O(edges x samples), fine for layouts of a few
//! hundred pieces. Large graphs would need a spatial index in front of this.

use bevy::prelude::*;

use crate::curve::{flat, sample_curve};
use crate::track_graph::{EdgeId, TrackGraph};

/// Where on the track a query point lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSegmentInfo {
    pub position: Vec3,
    /// Horizontal unit tangent in the edge's from -> to direction.
    pub forward: Vec3,
    /// Horizontal unit vector to the right of `forward`.
    pub right: Vec3,
    pub edge_id: EdgeId,
    pub t: f32,
    /// Horizontal distance from the query point, always >= 0.
    pub distance: f32,
}

/// Right-hand side vector of a horizontal forward tangent (Y up).
pub fn right_of(forward: Vec3) -> Vec3 {
    forward.cross(Vec3::Y).normalize_or(Vec3::NEG_X)
}

/// Find the closest sampled point of any edge to `query`, ignoring height.
///
/// Each edge is sampled at `samples_per_edge + 1` evenly spaced values of `t`
/// (both ends included), so doubling the density never loses a sample.
/// Returns `None` when the graph has no edges.
pub fn find_nearest(
    graph: &TrackGraph,
    query: Vec3,
    samples_per_edge: usize,
) -> Option<TrackSegmentInfo> {
    if graph.is_empty() {
        debug!("Nearest-edge search on empty track graph");
        return None;
    }

    let intervals = samples_per_edge.max(1);
    let query_flat = flat(query);
    let mut best: Option<TrackSegmentInfo> = None;

    for (edge, start, end) in graph.edges_with_endpoints() {
        for i in 0..=intervals {
            let t = i as f32 / intervals as f32;
            let sample = sample_curve(start, end, &edge.curve, t);
            let distance = (flat(sample.position) - query_flat).length();
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(TrackSegmentInfo {
                    position: sample.position,
                    forward: sample.tangent,
                    right: right_of(sample.tangent),
                    edge_id: edge.id,
                    t,
                    distance,
                });
            }
        }
    }

    if let Some(hit) = &best {
        trace!(
            "Nearest track: {} t={:.3} distance={:.4}",
            hit.edge_id,
            hit.t,
            hit.distance
        );
    }
    best
}
