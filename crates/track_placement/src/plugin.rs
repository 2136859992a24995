use bevy::prelude::*;

use crate::bounds::{collect_mesh_parts, compute_model_bounds, ModelBounds};
use crate::coordinator::PlacementResult;
use crate::params::PlacementParams;
use crate::scale_classifier::ScaleClassifierResult;

/// Request marker: measure this model's unscaled bounds.
///
/// Stays on the entity until its meshes are loaded and measurable.
#[derive(Component, Debug, Default)]
pub struct MeasureModelBounds;

/// Unscaled bounds of a model entity, written by [`measure_model_bounds`].
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MeasuredBounds(pub ModelBounds);

/// A committed placement to write into `entity`'s transform.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlacementCommitted {
    pub entity: Entity,
    pub result: PlacementResult,
}

/// A scale classification to apply to `entity`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ScaleApplied {
    pub entity: Entity,
    pub result: ScaleClassifierResult,
}

pub struct TrackPlacementPlugin;

impl Plugin for TrackPlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementParams>()
            .init_resource::<Assets<Mesh>>()
            .add_event::<PlacementCommitted>()
            .add_event::<ScaleApplied>()
            .add_systems(
                Update,
                (
                    measure_model_bounds,
                    apply_scale_results,
                    apply_committed_placements.after(apply_scale_results),
                ),
            );
    }
}

/// Measure every model tagged with [`MeasureModelBounds`] whose meshes are ready.
#[allow(clippy::type_complexity)]
pub fn measure_model_bounds(
    mut commands: Commands,
    pending: Query<Entity, With<MeasureModelBounds>>,
    children: Query<&Children>,
    mut transforms: ParamSet<(
        Query<(&Transform, Option<&Mesh3d>)>,
        Query<&mut Transform>,
    )>,
    meshes: Res<Assets<Mesh>>,
) {
    for entity in &pending {
        let parts = collect_mesh_parts(entity, &children, &transforms.p0(), &meshes);
        if parts.iter().any(|part| part.aabb.is_none()) {
            trace!("Meshes of {:?} still loading", entity);
            continue;
        }
        let mut roots = transforms.p1();
        let Ok(mut root) = roots.get_mut(entity) else {
            continue;
        };
        match compute_model_bounds(root.bypass_change_detection(), &parts) {
            Some(bounds) => {
                debug!("Measured bounds for {:?}: size {}", entity, bounds.size());
                commands
                    .entity(entity)
                    .insert(MeasuredBounds(bounds))
                    .remove::<MeasureModelBounds>();
            }
            None => {
                trace!("Bounds for {:?} not measurable yet", entity);
            }
        }
    }
}

pub fn apply_scale_results(
    mut events: EventReader<ScaleApplied>,
    mut transforms: Query<&mut Transform>,
) {
    for event in events.read() {
        if let Ok(mut transform) = transforms.get_mut(event.entity) {
            transform.scale = Vec3::splat(event.result.scale_factor);
            info!("{}", event.result.notification());
        }
    }
}

pub fn apply_committed_placements(
    mut events: EventReader<PlacementCommitted>,
    mut transforms: Query<&mut Transform>,
) {
    for event in events.read() {
        match transforms.get_mut(event.entity) {
            Ok(mut transform) => event.result.apply_to(&mut transform),
            Err(_) => warn!(
                "Committed placement for {:?} dropped: entity has no Transform",
                event.entity
            ),
        }
    }
}
