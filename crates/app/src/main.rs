//! Headless placement driver.
//!
//! Usage: `track_placement_demo [layout.json] [params.json]`
//!
//! Without a layout a small oval is built in place. Commands are read as
//! JSON lines from stdin; see [`protocol`] for the schema.

mod protocol;
mod session;

use std::sync::Arc;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use track_placement::{
    ArcDirection, PlacementCoordinator, PlacementParams, TrackGraph, TrackLayout,
    TrackLayoutBuilder, TrackPlacementPlugin, TrackSource,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let layout_path = args.next();
    let params_path = args.next();

    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    let params = match params_path {
        Some(path) => PlacementParams::load_or_default(path),
        None => PlacementParams::default(),
    };

    let graph = match layout_path {
        Some(path) => match TrackLayout::load_json(&path).map(TrackLayout::into_graph) {
            Ok(Ok(graph)) => Some(graph),
            Ok(Err(e)) => {
                error!("Layout {path} is invalid: {e}");
                None
            }
            Err(e) => {
                error!("Failed to load layout {path}: {e}");
                None
            }
        },
        None => {
            info!("No layout given; using built-in oval");
            demo_oval(params.rail_top_y).ok()
        }
    };

    let edges = graph.as_ref().map_or(0, TrackGraph::edge_count);
    let source = TrackSource::select(graph.map(Arc::new), Vec::new());
    info!("Track source: {:?} with {} edge(s)", source.strategy(), edges);

    app.add_plugins(TrackPlacementPlugin)
        .insert_resource(PlacementCoordinator::new(source, params.clone()))
        .insert_resource(params);

    session::run(&mut app, edges);
}

/// Two 1 m straights joined by 180 degree curves of OO first-radius track.
fn demo_oval(rail_top_y: f32) -> Result<TrackGraph, track_placement::TrackGraphError> {
    let mut builder = TrackLayoutBuilder::new(Vec3::new(0.0, rail_top_y, 0.0), Vec3::Z);
    for _ in 0..2 {
        builder.straight(1.0);
        builder.arc(0.371, 180.0, ArcDirection::Clockwise);
    }
    builder.build()
}
