//! Interactive placement session state machine.
//!
//! `Idle -> Placing -> {Committed, Cancelled} -> Idle`
//!
//! The host drives it synchronously: `start_placement` when the user picks a
//! model, `update` on every pointer move, `commit` on click, `cancel` on
//! escape or any external abort, and `finish` to collect the outcome and
//! return to `Idle`. Track data is injected at construction.

mod types;

pub use types::{ModelContext, PlacementOutcome, PlacementResult, PlacementState};

use std::sync::Arc;

use bevy::prelude::*;

use crate::alignment::align_to_surface;
use crate::orientation::OrientationResolver;
use crate::params::PlacementParams;
use crate::strategy::{OrientationStrategy, TrackSource};
use crate::track_graph::TrackGraph;

#[derive(Resource, Debug, Clone)]
pub struct PlacementCoordinator {
    source: TrackSource,
    params: PlacementParams,
    resolver: OrientationResolver,
    state: PlacementState,
    model: ModelContext,
    preview: Option<PlacementResult>,
    committed: Option<PlacementResult>,
}

impl PlacementCoordinator {
    pub fn new(source: TrackSource, params: PlacementParams) -> Self {
        let resolver = OrientationResolver::new(params.max_snap_distance, params.forward_axis_offsets);
        Self {
            source,
            params,
            resolver,
            state: PlacementState::Idle,
            model: ModelContext::default(),
            preview: None,
            committed: None,
        }
    }

    pub fn with_graph(graph: Arc<TrackGraph>, params: PlacementParams) -> Self {
        Self::new(TrackSource::Graph(graph), params)
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn is_placing(&self) -> bool {
        self.state == PlacementState::Placing
    }

    /// Latest preview of the running session.
    pub fn preview(&self) -> Option<&PlacementResult> {
        self.preview.as_ref()
    }

    pub fn model(&self) -> &ModelContext {
        &self.model
    }

    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    pub fn strategy(&self) -> Option<OrientationStrategy> {
        self.source.strategy()
    }

    /// Swap the track data, e.g. after the layout was edited.
    pub fn set_source(&mut self, source: TrackSource) {
        self.source = source;
        self.preview = None;
    }

    /// Update what is known about the model, e.g. once its meshes finished
    /// loading. Takes effect from the next `update`.
    pub fn set_model(&mut self, model: ModelContext) {
        self.model = model;
    }

    /// Begin a session. Returns false if one is already running.
    ///
    /// A finished session that was never collected with [`finish`](Self::finish)
    /// is discarded first.
    pub fn start_placement(&mut self, model: ModelContext) -> bool {
        if self.state == PlacementState::Placing {
            debug!("start_placement while already placing; ignored");
            return false;
        }
        if self.state.is_terminal() {
            warn!(
                "Discarding uncollected {:?} placement session before starting a new one",
                self.state
            );
            self.reset();
        }

        if model.bounds.is_none() {
            warn!("Placement started without measurable bounds; resting model origin on rail top");
        }
        if self.source.strategy().is_none() {
            warn!("Placement started with no track data; nothing can be placed");
        }

        self.model = model;
        self.state = PlacementState::Placing;
        info!(
            "Placement started ({:?}, forward axis {})",
            self.source.strategy(),
            model.forward_axis.label()
        );
        true
    }

    /// Compute a placement for `query` without touching session state.
    pub fn try_compute_placement(&self, query: Vec3) -> Option<PlacementResult> {
        let hit = self.source.locate(query, self.params.samples_per_edge)?;
        let orientation =
            self.resolver
                .resolve_tangent(hit.forward, hit.distance, self.model.forward_axis);

        let y = match &self.model.bounds {
            Some(bounds) => {
                align_to_surface(
                    bounds,
                    self.model.scale,
                    self.params.rail_top_y,
                    self.params.fine_tune_offset,
                )
                .final_y
            }
            None => self.params.rail_top_y + self.params.fine_tune_offset,
        };

        Some(PlacementResult {
            position: Vec3::new(hit.position.x, y, hit.position.z),
            yaw: orientation.yaw,
            is_valid: orientation.is_valid,
            segment: hit.segment,
            t: hit.t,
            distance: hit.distance,
            strategy: hit.strategy,
        })
    }

    /// Recompute the preview for a new pointer position. Only active while placing.
    pub fn update(&mut self, query: Vec3) -> Option<PlacementResult> {
        if self.state != PlacementState::Placing {
            return None;
        }
        self.preview = self.try_compute_placement(query);
        self.preview
    }

    /// Confirm the current preview. Rejected silently unless it is valid.
    pub fn commit(&mut self) -> Option<PlacementResult> {
        if self.state != PlacementState::Placing {
            return None;
        }
        match self.preview {
            Some(result) if result.is_valid => {
                info!(
                    "Placement committed at {} yaw={:.3} ({:?})",
                    result.position, result.yaw, result.segment
                );
                self.state = PlacementState::Committed;
                self.committed = Some(result);
                Some(result)
            }
            Some(result) => {
                debug!(
                    "Placement rejected: {:.4} from track exceeds snap distance {:.4}",
                    result.distance, self.params.max_snap_distance
                );
                None
            }
            None => {
                debug!("Placement rejected: no track under pointer");
                None
            }
        }
    }

    /// Abandon the running session. Returns false if nothing was placing.
    pub fn cancel(&mut self) -> bool {
        if self.state != PlacementState::Placing {
            return false;
        }
        info!("Placement cancelled");
        self.state = PlacementState::Cancelled;
        self.preview = None;
        self.committed = None;
        true
    }

    /// Collect the outcome of a finished session and return to `Idle`.
    pub fn finish(&mut self) -> Option<PlacementOutcome> {
        let outcome = match self.state {
            PlacementState::Committed => self.committed.map(PlacementOutcome::Committed),
            PlacementState::Cancelled => Some(PlacementOutcome::Cancelled),
            PlacementState::Idle | PlacementState::Placing => return None,
        };
        self.reset();
        outcome
    }

    fn reset(&mut self) {
        self.state = PlacementState::Idle;
        self.preview = None;
        self.committed = None;
    }
}
