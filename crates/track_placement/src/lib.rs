//! Track-relative placement of model-railway rolling stock.
//!
//! Given a track network and a pointer position, find the nearest point on
//! the track, orient a model along the local tangent, sit it on the rail top,
//! and optionally correct its scale to OO gauge. [`PlacementCoordinator`]
//! ties these together into an interactive commit/cancel session;
//! [`TrackPlacementPlugin`] wires the results into a Bevy app.

pub mod alignment;
pub mod bounds;
pub mod config;
pub mod coordinator;
pub mod curve;
pub mod locator;
pub mod orientation;
pub mod params;
pub mod plugin;
pub mod scale_classifier;
pub mod strategy;
pub mod track_graph;

pub use alignment::{align_to_surface, VerticalAlignment};
pub use bounds::{compute_model_bounds, MeshPart, ModelBounds};
pub use coordinator::{
    ModelContext, PlacementCoordinator, PlacementOutcome, PlacementResult, PlacementState,
};
pub use curve::{ArcDirection, CurveDefinition, CurveSample};
pub use locator::{find_nearest, TrackSegmentInfo};
pub use orientation::{ForwardAxis, OrientationResolver, ResolvedOrientation};
pub use params::{ConfigError, PlacementParams};
pub use plugin::{MeasureModelBounds, MeasuredBounds, PlacementCommitted, ScaleApplied, TrackPlacementPlugin};
pub use scale_classifier::{RollingStockType, ScaleClassifier, ScaleClassifierResult, ScalePolicy};
pub use strategy::{OrientationStrategy, SegmentRef, TrackHit, TrackPieceMesh, TrackSource};
pub use track_graph::{EdgeId, NodeId, TrackGraph, TrackGraphError, TrackLayout, TrackLayoutBuilder};
