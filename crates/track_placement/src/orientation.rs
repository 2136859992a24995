//! Track tangent to model yaw, corrected for the asset's forward axis.
//!
//! Yaw is measured from +Z toward +X, which matches
//! `Quat::from_rotation_y`: a yaw of `a` turns +Z into `(sin a, 0, cos a)`.
//! Pitch and roll are never produced.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_SNAP_DISTANCE;
use crate::locator::TrackSegmentInfo;

/// Which local axis of an authored model points toward its front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardAxis {
    PosX,
    NegX,
    PosY,
    NegY,
    #[default]
    PosZ,
    NegZ,
}

impl ForwardAxis {
    pub const ALL: [ForwardAxis; 6] = [
        ForwardAxis::PosX,
        ForwardAxis::NegX,
        ForwardAxis::PosY,
        ForwardAxis::NegY,
        ForwardAxis::PosZ,
        ForwardAxis::NegZ,
    ];

    /// Built-in yaw offset that turns this axis onto the track tangent.
    ///
    /// Vertical axes cannot be corrected by yaw alone and map to 0.
    pub const fn default_yaw_offset(self) -> f32 {
        match self {
            ForwardAxis::PosZ => 0.0,
            ForwardAxis::NegZ => PI,
            ForwardAxis::PosX => -FRAC_PI_2,
            ForwardAxis::NegX => FRAC_PI_2,
            ForwardAxis::PosY | ForwardAxis::NegY => 0.0,
        }
    }

    pub fn local_vector(self) -> Vec3 {
        match self {
            ForwardAxis::PosX => Vec3::X,
            ForwardAxis::NegX => Vec3::NEG_X,
            ForwardAxis::PosY => Vec3::Y,
            ForwardAxis::NegY => Vec3::NEG_Y,
            ForwardAxis::PosZ => Vec3::Z,
            ForwardAxis::NegZ => Vec3::NEG_Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForwardAxis::PosX => "+X",
            ForwardAxis::NegX => "-X",
            ForwardAxis::PosY => "+Y",
            ForwardAxis::NegY => "-Y",
            ForwardAxis::PosZ => "+Z",
            ForwardAxis::NegZ => "-Z",
        }
    }
}

/// Overridable yaw offset per forward axis, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardAxisOffsets {
    pub pos_x: f32,
    pub neg_x: f32,
    pub pos_y: f32,
    pub neg_y: f32,
    pub pos_z: f32,
    pub neg_z: f32,
}

impl Default for ForwardAxisOffsets {
    fn default() -> Self {
        Self {
            pos_x: ForwardAxis::PosX.default_yaw_offset(),
            neg_x: ForwardAxis::NegX.default_yaw_offset(),
            pos_y: ForwardAxis::PosY.default_yaw_offset(),
            neg_y: ForwardAxis::NegY.default_yaw_offset(),
            pos_z: ForwardAxis::PosZ.default_yaw_offset(),
            neg_z: ForwardAxis::NegZ.default_yaw_offset(),
        }
    }
}

impl ForwardAxisOffsets {
    pub fn offset_for(&self, axis: ForwardAxis) -> f32 {
        match axis {
            ForwardAxis::PosX => self.pos_x,
            ForwardAxis::NegX => self.neg_x,
            ForwardAxis::PosY => self.pos_y,
            ForwardAxis::NegY => self.neg_y,
            ForwardAxis::PosZ => self.pos_z,
            ForwardAxis::NegZ => self.neg_z,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for axis in ForwardAxis::ALL {
            if !self.offset_for(axis).is_finite() {
                return Err(format!("forward axis offset for {} is not finite", axis.label()));
            }
        }
        Ok(())
    }
}

/// Wrap an angle into (-PI, PI].
pub fn normalize_angle(angle: f32) -> f32 {
    PI - (PI - angle).rem_euclid(TAU)
}

/// Yaw of a horizontal tangent, measured from +Z toward +X.
pub fn track_yaw(tangent: Vec3) -> f32 {
    tangent.x.atan2(tangent.z)
}

/// Pure yaw rotation.
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Yaw that points a model's `axis` along `tangent`.
pub fn resolve_yaw(tangent: Vec3, axis: ForwardAxis, offsets: &ForwardAxisOffsets) -> f32 {
    normalize_angle(track_yaw(tangent) + offsets.offset_for(axis))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOrientation {
    pub track_angle: f32,
    pub model_offset: f32,
    /// `track_angle + model_offset`, wrapped into (-PI, PI].
    pub yaw: f32,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrientationResolver {
    pub max_snap_distance: f32,
    pub offsets: ForwardAxisOffsets,
}

impl Default for OrientationResolver {
    fn default() -> Self {
        Self {
            max_snap_distance: DEFAULT_MAX_SNAP_DISTANCE,
            offsets: ForwardAxisOffsets::default(),
        }
    }
}

impl OrientationResolver {
    pub fn new(max_snap_distance: f32, offsets: ForwardAxisOffsets) -> Self {
        Self {
            max_snap_distance,
            offsets,
        }
    }

    pub fn resolve_tangent(
        &self,
        tangent: Vec3,
        distance: f32,
        axis: ForwardAxis,
    ) -> ResolvedOrientation {
        let track_angle = track_yaw(tangent);
        let model_offset = self.offsets.offset_for(axis);
        ResolvedOrientation {
            track_angle,
            model_offset,
            yaw: normalize_angle(track_angle + model_offset),
            is_valid: distance <= self.max_snap_distance,
        }
    }

    pub fn resolve(&self, segment: &TrackSegmentInfo, axis: ForwardAxis) -> ResolvedOrientation {
        self.resolve_tangent(segment.forward, segment.distance, axis)
    }
}
