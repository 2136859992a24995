//! Unscaled model bounds from mesh geometry.
//!
//! Bounds are measured in the model root's local frame with the root scale
//! pinned to 1 for the duration of the measurement. A model whose meshes
//! have no usable geometry yet (still loading, empty attribute buffers)
//! yields `None`, which is distinct from a genuine zero-size box.

use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::render::primitives::Aabb;

/// Axis-aligned bounds of a model in its own unscaled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    /// Bounds spanning two arbitrary corners.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Extent along X.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Extent along Y.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Extent along Z.
    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn bottom_center(&self) -> Vec3 {
        let c = self.center();
        Vec3::new(c.x, self.min.y, c.z)
    }

    /// Largest horizontal extent, i.e. the model's running length.
    pub fn max_horizontal_extent(&self) -> f32 {
        self.width().max(self.depth())
    }

    pub fn is_zero_size(&self) -> bool {
        self.size() == Vec3::ZERO
    }

    pub fn scaled(&self, scale: f32) -> Self {
        Self::from_corners(self.min * scale, self.max * scale)
    }

    fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

/// One mesh of a model: its local box and its transform relative to the
/// model root (root transform excluded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPart {
    pub aabb: Option<Aabb>,
    pub transform: Transform,
}

impl MeshPart {
    pub fn new(aabb: Option<Aabb>, transform: Transform) -> Self {
        Self { aabb, transform }
    }

    pub fn from_mesh(mesh: &Mesh, transform: Transform) -> Self {
        Self::new(mesh.compute_aabb(), transform)
    }

    fn local_bounds(&self) -> Option<ModelBounds> {
        let aabb = self.aabb?;
        let min = Vec3::from(aabb.min());
        let max = Vec3::from(aabb.max());
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        Some(ModelBounds::from_corners(min, max))
    }
}

/// Pins a transform's scale to 1 and restores the original on drop.
///
/// Restoration happens on every exit path, including early returns and
/// unwinding, so callers never observe the temporary scale.
pub struct UnitScaleGuard<'a> {
    transform: &'a mut Transform,
    saved_scale: Vec3,
}

impl<'a> UnitScaleGuard<'a> {
    pub fn new(transform: &'a mut Transform) -> Self {
        let saved_scale = transform.scale;
        transform.scale = Vec3::ONE;
        Self {
            transform,
            saved_scale,
        }
    }

    pub fn transform(&self) -> &Transform {
        &*self.transform
    }

    pub fn saved_scale(&self) -> Vec3 {
        self.saved_scale
    }
}

impl Drop for UnitScaleGuard<'_> {
    fn drop(&mut self) {
        self.transform.scale = self.saved_scale;
    }
}

/// Reduce every part's box into one running min/max in the root frame.
///
/// The root's own transform is not part of the measurement: part transforms
/// are already relative to the root, so the result is in the root's local,
/// unscaled frame whatever the root's translation, rotation or scale. The
/// root scale is still pinned to 1 for the duration, and `root` is left
/// exactly as it was on return.
pub fn compute_model_bounds(root: &mut Transform, parts: &[MeshPart]) -> Option<ModelBounds> {
    let _unit_scale = UnitScaleGuard::new(root);

    let mut acc: Option<ModelBounds> = None;
    for part in parts {
        let Some(local) = part.local_bounds() else {
            continue;
        };
        let matrix = part.transform.compute_matrix();
        for corner in local.corners() {
            let p = matrix.transform_point3(corner);
            match acc.as_mut() {
                Some(bounds) => bounds.include(p),
                None => acc = Some(ModelBounds::from_corners(p, p)),
            }
        }
    }

    if acc.is_none() {
        debug!(
            "No mesh with valid bounds among {} part(s); bounds are degenerate",
            parts.len()
        );
    }
    acc
}

/// Walk the hierarchy under `root` and gather every mesh with its transform
/// relative to `root`. Meshes whose asset is not loaded yet are reported
/// with `aabb: None`.
pub fn collect_mesh_parts(
    root: Entity,
    children: &Query<&Children>,
    nodes: &Query<(&Transform, Option<&Mesh3d>)>,
    meshes: &Assets<Mesh>,
) -> Vec<MeshPart> {
    let mut parts = Vec::new();
    let mut stack = vec![(root, Transform::IDENTITY)];

    while let Some((entity, relative)) = stack.pop() {
        if let Ok((_, Some(mesh))) = nodes.get(entity) {
            let aabb = meshes.get(&mesh.0).and_then(Mesh::compute_aabb);
            parts.push(MeshPart::new(aabb, relative));
        }
        if let Ok(kids) = children.get(entity) {
            for &child in kids.iter() {
                let local = nodes.get(child).map(|(t, _)| *t).unwrap_or_default();
                stack.push((child, relative * local));
            }
        }
    }
    parts
}
