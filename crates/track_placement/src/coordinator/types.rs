use bevy::prelude::*;

use crate::bounds::ModelBounds;
use crate::orientation::{yaw_rotation, ForwardAxis};
use crate::strategy::{OrientationStrategy, SegmentRef};
use crate::track_graph::EdgeId;

/// Lifecycle of one interactive placement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementState {
    /// No session in progress.
    #[default]
    Idle,
    /// Following the pointer and producing previews.
    Placing,
    /// A valid placement was confirmed; waiting to be collected.
    Committed,
    /// The session was abandoned; waiting to be collected.
    Cancelled,
}

impl PlacementState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PlacementState::Committed | PlacementState::Cancelled)
    }
}

/// Immutable snapshot of where a model should go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub position: Vec3,
    /// Rotation about +Y in radians, within (-PI, PI].
    pub yaw: f32,
    /// True when the query was within snap distance of the track.
    pub is_valid: bool,
    pub segment: SegmentRef,
    pub t: f32,
    pub distance: f32,
    pub strategy: OrientationStrategy,
}

impl PlacementResult {
    pub fn edge_id(&self) -> Option<EdgeId> {
        match self.segment {
            SegmentRef::Edge(id) => Some(id),
            SegmentRef::Piece(_) => None,
        }
    }

    pub fn rotation(&self) -> Quat {
        yaw_rotation(self.yaw)
    }

    /// Write translation and rotation into `transform`; scale is left alone.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = self.rotation();
    }
}

/// What the coordinator knows about the model being placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelContext {
    /// Unscaled bounds, or `None` while the model's meshes are not measurable.
    pub bounds: Option<ModelBounds>,
    /// Uniform scale the model is rendered at.
    pub scale: f32,
    pub forward_axis: ForwardAxis,
}

impl Default for ModelContext {
    fn default() -> Self {
        Self {
            bounds: None,
            scale: 1.0,
            forward_axis: ForwardAxis::default(),
        }
    }
}

impl ModelContext {
    pub fn new(bounds: Option<ModelBounds>, scale: f32, forward_axis: ForwardAxis) -> Self {
        Self {
            bounds,
            scale,
            forward_axis,
        }
    }
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    Committed(PlacementResult),
    Cancelled,
}
