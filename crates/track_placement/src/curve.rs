//! Parametric sampling of straight and circular-arc track segments.
//!
//! All functions are pure. Tangents are horizontal (y = 0) unit vectors;
//! height is interpolated linearly in `t` for both curve kinds.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::POSITION_EPSILON;

/// Tangent used when a segment has no horizontal extent.
pub const FALLBACK_TANGENT: Vec3 = Vec3::Z;

/// Which way an arc sweeps, seen from above (looking down -Y).
///
/// `Clockwise` sweeps from +X toward +Z and corresponds to a direction sign of +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

impl ArcDirection {
    /// +1.0 for clockwise, -1.0 for counter-clockwise.
    pub fn sign(self) -> f32 {
        match self {
            ArcDirection::Clockwise => 1.0,
            ArcDirection::CounterClockwise => -1.0,
        }
    }

    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            ArcDirection::CounterClockwise
        } else {
            ArcDirection::Clockwise
        }
    }
}

/// Shape of the track between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveDefinition {
    Straight,
    Arc {
        radius: f32,
        sweep_angle_deg: f32,
        direction: ArcDirection,
    },
}

impl CurveDefinition {
    /// Horizontal length of the curve between `start` and `end`.
    pub fn horizontal_length(&self, start: Vec3, end: Vec3) -> f32 {
        match *self {
            CurveDefinition::Straight => (flat(end) - flat(start)).length(),
            CurveDefinition::Arc {
                radius,
                sweep_angle_deg,
                ..
            } => {
                if arc_is_degenerate(start, end, radius, sweep_angle_deg) {
                    (flat(end) - flat(start)).length()
                } else {
                    radius * sweep_angle_deg.abs().to_radians()
                }
            }
        }
    }
}

/// Position and horizontal unit tangent at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    pub tangent: Vec3,
}

/// Project onto the horizontal plane as `(x, z)`.
#[inline]
pub fn flat(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

#[inline]
fn unflat(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// Sample a straight segment at `t` (clamped to [0, 1]).
pub fn sample_straight(start: Vec3, end: Vec3, t: f32) -> CurveSample {
    let t = t.clamp(0.0, 1.0);
    let horizontal = flat(end) - flat(start);
    let tangent = if horizontal.length() < POSITION_EPSILON {
        FALLBACK_TANGENT
    } else {
        let dir = horizontal.normalize();
        unflat(dir, 0.0)
    };
    CurveSample {
        position: start.lerp(end, t),
        tangent,
    }
}

fn arc_is_degenerate(start: Vec3, end: Vec3, radius: f32, sweep_angle_deg: f32) -> bool {
    (flat(end) - flat(start)).length() < POSITION_EPSILON
        || !radius.is_finite()
        || radius <= POSITION_EPSILON
        || !sweep_angle_deg.is_finite()
        || sweep_angle_deg.abs() <= f32::EPSILON
}

/// Heading at the start of an arc whose chord runs from `start` to `end`.
///
/// A circular arc leaves its start point at half the sweep angle away from
/// the chord, on the side opposite to the turn.
fn arc_start_heading(start: Vec3, end: Vec3, sweep_rad: f32, sign: f32) -> Vec2 {
    let chord = (flat(end) - flat(start)).normalize();
    Vec2::from_angle(-sign * sweep_rad * 0.5).rotate(chord)
}

/// Horizontal center of the arc, or `None` for degenerate arcs.
pub fn arc_center(
    start: Vec3,
    end: Vec3,
    radius: f32,
    sweep_angle_deg: f32,
    direction: ArcDirection,
) -> Option<Vec2> {
    if arc_is_degenerate(start, end, radius, sweep_angle_deg) {
        return None;
    }
    let sign = direction.sign();
    let heading = arc_start_heading(start, end, sweep_angle_deg.abs().to_radians(), sign);
    Some(flat(start) + sign * radius * heading.perp())
}

/// Sample a circular arc at `t` (clamped to [0, 1]).
///
/// The center sits `radius` away from `start`, perpendicular to the start
/// heading on the turning side. Height is linear in `t`, not in arc length.
/// Degenerate arcs fall back to [`sample_straight`].
pub fn sample_arc(
    start: Vec3,
    end: Vec3,
    radius: f32,
    sweep_angle_deg: f32,
    direction: ArcDirection,
    t: f32,
) -> CurveSample {
    let Some(center) = arc_center(start, end, radius, sweep_angle_deg, direction) else {
        return sample_straight(start, end, t);
    };
    let t = t.clamp(0.0, 1.0);
    let sign = direction.sign();
    let sweep = sweep_angle_deg.abs().to_radians();

    let radial = flat(start) - center;
    let start_angle = radial.y.atan2(radial.x);
    let angle = start_angle + sign * sweep * t;
    let (sin, cos) = angle.sin_cos();

    let xz = center + radius * Vec2::new(cos, sin);
    let y = start.y + (end.y - start.y) * t;
    let tangent = sign * Vec2::new(-sin, cos);

    CurveSample {
        position: unflat(xz, y),
        tangent: unflat(tangent.normalize_or(flat(FALLBACK_TANGENT)), 0.0),
    }
}

/// Sample any curve definition at `t`.
pub fn sample_curve(start: Vec3, end: Vec3, curve: &CurveDefinition, t: f32) -> CurveSample {
    match *curve {
        CurveDefinition::Straight => sample_straight(start, end, t),
        CurveDefinition::Arc {
            radius,
            sweep_angle_deg,
            direction,
        } => sample_arc(start, end, radius, sweep_angle_deg, direction, t),
    }
}

/// End position and end heading of an arc that leaves `start` along `heading`.
///
/// Used by layout authoring to place the far node of an arc piece so that
/// [`sample_arc`] reproduces it exactly at `t = 1`. `rise` is the height
/// change across the piece.
pub fn arc_end_point(
    start: Vec3,
    heading: Vec3,
    radius: f32,
    sweep_angle_deg: f32,
    direction: ArcDirection,
    rise: f32,
) -> (Vec3, Vec3) {
    let heading2 = flat(heading).normalize_or(flat(FALLBACK_TANGENT));
    let sign = direction.sign();
    let sweep = sweep_angle_deg.abs().to_radians();
    let center = flat(start) + sign * radius * heading2.perp();

    let radial = flat(start) - center;
    let end_angle = radial.y.atan2(radial.x) + sign * sweep;
    let (sin, cos) = end_angle.sin_cos();

    let end = unflat(center + radius * Vec2::new(cos, sin), start.y + rise);
    let end_heading = unflat(sign * Vec2::new(-sin, cos), 0.0);
    (end, end_heading)
}
