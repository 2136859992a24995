//! Compile-time defaults for the placement engine.
//!
//! Every value here can be overridden at runtime through
//! [`PlacementParams`](crate::params::PlacementParams); these constants are
//! only the starting point.

/// Maximum horizontal distance from a track centerline for a placement to be
/// accepted, in metres.
pub const DEFAULT_MAX_SNAP_DISTANCE: f32 = 0.05;

/// Number of parametric intervals sampled per edge by the nearest-edge search.
/// Each edge is sampled at `DEFAULT_SAMPLES_PER_EDGE + 1` points (both ends included).
pub const DEFAULT_SAMPLES_PER_EDGE: usize = 20;

/// Absolute height of the rail running surface in world units.
pub const DEFAULT_RAIL_TOP_Y: f32 = 0.958;

/// Two positions closer than this are treated as coincident (degenerate chord).
pub const POSITION_EPSILON: f32 = 1e-6;

// ---------------------------------------------------------------------------
// Canonical OO-gauge rolling stock lengths (millimetres)
// ---------------------------------------------------------------------------

pub const LOCOMOTIVE_LENGTH_MM: (f32, f32) = (200.0, 280.0);
pub const COACH_LENGTH_MM: (f32, f32) = (250.0, 305.0);
pub const WAGON_LENGTH_MM: (f32, f32) = (100.0, 150.0);

// ---------------------------------------------------------------------------
// Length-band classification (metres, unscaled model units)
// ---------------------------------------------------------------------------

/// Models longer than this are classified as coaches.
pub const COACH_MIN_LENGTH_M: f32 = 0.5;
/// Models at least this long (and not coaches) are classified as locomotives.
pub const LOCOMOTIVE_MIN_LENGTH_M: f32 = 0.3;

// ---------------------------------------------------------------------------
// Absolute-size classification (millimetres, relative to OO-gauge expectations)
// ---------------------------------------------------------------------------

/// Above this the model was authored at full or near-full size.
pub const OVERSIZED_ABOVE_MM: f32 = 500.0;
/// Upper edge of the "already OO scale" band.
pub const CORRECT_BELOW_MM: f32 = 100.0;
/// Below this the model is too small to be OO rolling stock.
pub const UNDERSIZED_BELOW_MM: f32 = 20.0;

/// Dimension, in metres, that the largest horizontal extent of an oversized or
/// undersized model is rescaled to under the absolute-size policy.
pub const ABSOLUTE_SIZE_TARGET_M: f32 = 0.035;
