//! Rest a model's lowest point on a target surface.

use crate::bounds::ModelBounds;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalAlignment {
    /// Y to assign to the model root.
    pub final_y: f32,
    /// Lowest point of the model relative to its origin, after scaling.
    pub scaled_min_y: f32,
    pub target_surface_y: f32,
}

impl VerticalAlignment {
    /// World-space Y of the model's lowest point once `final_y` is applied.
    pub fn bottom_y(&self) -> f32 {
        self.final_y + self.scaled_min_y
    }
}

/// Y position that puts the bottom of `bounds` at `target_surface_y`.
///
/// `bounds` must be unscaled; `scale` is the uniform scale the model will be
/// rendered at. `fine_tune_offset` is added on top, so with a zero offset
/// `final_y + scaled_min_y == target_surface_y`.
pub fn align_to_surface(
    bounds: &ModelBounds,
    scale: f32,
    target_surface_y: f32,
    fine_tune_offset: f32,
) -> VerticalAlignment {
    let scaled_min_y = bounds.min.y * scale;
    VerticalAlignment {
        final_y: target_surface_y - scaled_min_y + fine_tune_offset,
        scaled_min_y,
        target_surface_y,
    }
}
