//! Where track information comes from: the authored graph, or, when no graph
//! is available, the placed track-piece meshes themselves.
//!
//! The mesh path approximates each piece by a straight centerline along its
//! longest horizontal bounds axis. Curved pieces come out as chords, so hits
//! from this path carry a lower confidence.

use std::sync::Arc;

use bevy::prelude::*;

use crate::bounds::ModelBounds;
use crate::curve::{flat, sample_straight};
use crate::locator::{find_nearest, right_of, TrackSegmentInfo};
use crate::track_graph::{EdgeId, TrackGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrientationStrategy {
    GraphBased,
    MeshBased,
}

impl OrientationStrategy {
    /// How much the resulting orientation can be trusted.
    pub fn confidence(self) -> f32 {
        match self {
            OrientationStrategy::GraphBased => 1.0,
            OrientationStrategy::MeshBased => 0.6,
        }
    }
}

/// Identifies the piece of track a hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRef {
    Edge(EdgeId),
    /// Index into the track-piece mesh list.
    Piece(usize),
}

/// A located point on the track, from either strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackHit {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub segment: SegmentRef,
    pub t: f32,
    pub distance: f32,
    pub strategy: OrientationStrategy,
}

impl From<TrackSegmentInfo> for TrackHit {
    fn from(info: TrackSegmentInfo) -> Self {
        Self {
            position: info.position,
            forward: info.forward,
            right: info.right,
            segment: SegmentRef::Edge(info.edge_id),
            t: info.t,
            distance: info.distance,
            strategy: OrientationStrategy::GraphBased,
        }
    }
}

/// A rendered piece of track: its world transform and unscaled local bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPieceMesh {
    pub transform: Transform,
    pub bounds: ModelBounds,
}

impl TrackPieceMesh {
    /// World-space centerline along the longest horizontal axis, at the top
    /// of the piece.
    pub fn centerline(&self) -> (Vec3, Vec3) {
        let b = &self.bounds;
        let c = b.center();
        let half = if b.width() >= b.depth() {
            Vec3::new(b.width() * 0.5, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, b.depth() * 0.5)
        };
        let top = Vec3::new(c.x, b.max.y, c.z);
        (
            self.transform.transform_point(top - half),
            self.transform.transform_point(top + half),
        )
    }
}

/// Closest point on any piece centerline to `query`, ignoring height.
pub fn find_nearest_piece(pieces: &[TrackPieceMesh], query: Vec3) -> Option<TrackHit> {
    let q = flat(query);
    let mut best: Option<TrackHit> = None;

    for (index, piece) in pieces.iter().enumerate() {
        let (a, b) = piece.centerline();
        let ab = flat(b) - flat(a);
        let len_sq = ab.length_squared();
        let t = if len_sq > 0.0 {
            ((q - flat(a)).dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let sample = sample_straight(a, b, t);
        let distance = (flat(sample.position) - q).length();
        if best.map_or(true, |h| distance < h.distance) {
            best = Some(TrackHit {
                position: sample.position,
                forward: sample.tangent,
                right: right_of(sample.tangent),
                segment: SegmentRef::Piece(index),
                t,
                distance,
                strategy: OrientationStrategy::MeshBased,
            });
        }
    }
    best
}

/// Track data handed to the placement coordinator.
#[derive(Debug, Clone, Default)]
pub enum TrackSource {
    Graph(Arc<TrackGraph>),
    Meshes(Arc<[TrackPieceMesh]>),
    #[default]
    Unavailable,
}

impl TrackSource {
    /// Prefer a non-empty graph, then any track meshes.
    pub fn select(graph: Option<Arc<TrackGraph>>, pieces: Vec<TrackPieceMesh>) -> Self {
        match graph {
            Some(graph) if !graph.is_empty() => TrackSource::Graph(graph),
            _ if !pieces.is_empty() => TrackSource::Meshes(pieces.into()),
            _ => TrackSource::Unavailable,
        }
    }

    pub fn strategy(&self) -> Option<OrientationStrategy> {
        match self {
            TrackSource::Graph(_) => Some(OrientationStrategy::GraphBased),
            TrackSource::Meshes(_) => Some(OrientationStrategy::MeshBased),
            TrackSource::Unavailable => None,
        }
    }

    pub fn locate(&self, query: Vec3, samples_per_edge: usize) -> Option<TrackHit> {
        match self {
            TrackSource::Graph(graph) => find_nearest(graph, query, samples_per_edge).map(TrackHit::from),
            TrackSource::Meshes(pieces) => find_nearest_piece(pieces, query),
            TrackSource::Unavailable => None,
        }
    }
}
