//! Headless placement loop: reads [`Command`]s from stdin, drives the
//! [`PlacementCoordinator`] resource, and writes [`Response`]s to stdout.
//!
//! Logging goes to stderr so it does not interfere with the protocol.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use track_placement::{
    ModelBounds, ModelContext, PlacementCommitted, PlacementCoordinator, PlacementOutcome,
    PlacementParams, RollingStockType, ScaleApplied, ScaleClassifier,
};

use crate::protocol::{response, Command, Payload, PlacementReport, Response};

/// The model entity of the running (or last finished) session.
#[derive(Resource, Default)]
pub struct ActiveModel(pub Option<Entity>);

/// Run the command loop until `quit` or end of input. `edges` is reported
/// in the ready message.
pub fn run(app: &mut App, edges: usize) {
    app.init_resource::<ActiveModel>();
    app.update();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    let strategy = app
        .world()
        .resource::<PlacementCoordinator>()
        .strategy()
        .map(|s| format!("{s:?}"));
    write_response(&mut stdout, &response(Payload::Ready { edges, strategy }));

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<Command>(&line) {
            Ok(cmd) => process_command(cmd, app),
            Err(e) => response(Payload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(resp.payload, Payload::Goodbye);
        write_response(&mut stdout, &resp);
        if is_goodbye {
            break;
        }
    }

    info!("placement session loop shutting down");
}

fn write_response(out: &mut impl Write, resp: &Response) {
    match serde_json::to_string(resp) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
        Err(e) => error!("failed to serialize response: {e}"),
    }
}

pub fn process_command(cmd: Command, app: &mut App) -> Response {
    match cmd {
        Command::Start {
            bounds,
            forward_axis,
            hint,
            scale,
        } => {
            if app
                .world()
                .resource::<PlacementCoordinator>()
                .state()
                .is_terminal()
            {
                return response(Payload::Rejected {
                    reason: "previous placement not collected; send finish first".into(),
                });
            }

            let bounds = bounds
                .map(|[min, max]| ModelBounds::from_corners(Vec3::from(min), Vec3::from(max)));
            let hint = hint.as_deref().and_then(RollingStockType::from_hint);

            let explicit_scale = scale;
            let classification = match explicit_scale {
                Some(_) => None,
                None => bounds.map(|b| {
                    let params = app.world().resource::<PlacementParams>();
                    ScaleClassifier::from_params(params).classify(&b, hint)
                }),
            };
            let scale = explicit_scale
                .or(classification.map(|c| c.scale_factor))
                .unwrap_or(1.0);

            let started = app
                .world_mut()
                .resource_mut::<PlacementCoordinator>()
                .start_placement(ModelContext::new(bounds, scale, forward_axis));
            if !started {
                return response(Payload::Rejected {
                    reason: "a placement is already in progress".into(),
                });
            }

            let entity = app.world_mut().spawn(Transform::IDENTITY).id();
            app.world_mut().resource_mut::<ActiveModel>().0 = Some(entity);
            if let Some(result) = classification {
                app.world_mut().send_event(ScaleApplied { entity, result });
            } else {
                app.world_mut()
                    .entity_mut(entity)
                    .insert(Transform::from_scale(Vec3::splat(scale)));
            }
            app.update();

            response(Payload::Started {
                scale,
                detected_type: classification.and_then(|c| c.detected_type),
                notification: match (classification, explicit_scale) {
                    (Some(c), _) => c.notification(),
                    (None, Some(s)) => format!("Scale set to {s}"),
                    (None, None) => "Model size unknown; scale unchanged".into(),
                },
            })
        }

        Command::Pointer { x, y, z } => {
            let mut coordinator = app.world_mut().resource_mut::<PlacementCoordinator>();
            if !coordinator.is_placing() {
                return response(Payload::Rejected {
                    reason: "no placement in progress".into(),
                });
            }
            let preview = coordinator.update(Vec3::new(x, y, z));
            response(Payload::Preview {
                placement: preview.as_ref().map(PlacementReport::from),
            })
        }

        Command::Commit => {
            let committed = app
                .world_mut()
                .resource_mut::<PlacementCoordinator>()
                .commit();
            match committed {
                Some(result) => response(Payload::Committed {
                    placement: PlacementReport::from(&result),
                }),
                None => response(Payload::Rejected {
                    reason: "no valid placement under pointer".into(),
                }),
            }
        }

        Command::Cancel => {
            if app
                .world_mut()
                .resource_mut::<PlacementCoordinator>()
                .cancel()
            {
                response(Payload::Cancelled)
            } else {
                response(Payload::Rejected {
                    reason: "no placement in progress".into(),
                })
            }
        }

        Command::Finish => finish(app),

        Command::Quit => response(Payload::Goodbye),
    }
}

fn finish(app: &mut App) -> Response {
    let outcome = app
        .world_mut()
        .resource_mut::<PlacementCoordinator>()
        .finish();
    let entity = app.world_mut().resource_mut::<ActiveModel>().0.take();

    match (outcome, entity) {
        (Some(PlacementOutcome::Committed(result)), Some(entity)) => {
            app.world_mut()
                .send_event(PlacementCommitted { entity, result });
            app.update();
            let transform = app.world().get::<Transform>(entity).copied();
            response(Payload::Finished {
                outcome: "committed".into(),
                translation: transform.map(|t| t.translation.to_array()),
                yaw: Some(result.yaw),
            })
        }
        (Some(PlacementOutcome::Cancelled), entity) => {
            if let Some(entity) = entity {
                app.world_mut().despawn(entity);
            }
            response(Payload::Finished {
                outcome: "cancelled".into(),
                translation: None,
                yaw: None,
            })
        }
        (Some(PlacementOutcome::Committed(_)), None) => response(Payload::Error {
            message: "committed placement has no model entity".into(),
        }),
        (None, entity) => {
            app.world_mut().resource_mut::<ActiveModel>().0 = entity;
            response(Payload::Rejected {
                reason: "no finished placement to collect".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use track_placement::{TrackPlacementPlugin, TrackLayoutBuilder};

    fn app() -> App {
        let mut builder = TrackLayoutBuilder::new(Vec3::ZERO, Vec3::Z);
        builder.straight(1.0);
        let graph = Arc::new(builder.build().expect("valid graph"));

        let mut app = App::new();
        app.add_plugins(TrackPlacementPlugin);
        app.insert_resource(PlacementCoordinator::with_graph(graph, PlacementParams::default()));
        app.init_resource::<ActiveModel>();
        app
    }

    fn cmd(json: &str) -> Command {
        serde_json::from_str(json).expect("valid command")
    }

    #[test]
    fn test_commit_moves_model_entity() {
        let mut app = app();
        let resp = process_command(
            cmd(r#"{"cmd":"start","bounds":[[-0.1,-0.02,-0.3],[0.1,0.2,0.3]],"scale":0.12}"#),
            &mut app,
        );
        assert!(matches!(resp.payload, Payload::Started { .. }));

        let resp = process_command(cmd(r#"{"cmd":"pointer","x":0.01,"y":0,"z":0.5}"#), &mut app);
        assert!(matches!(
            resp.payload,
            Payload::Preview { placement: Some(PlacementReport { is_valid: true, .. }) }
        ));

        let resp = process_command(cmd(r#"{"cmd":"commit"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Committed { .. }));

        let resp = process_command(cmd(r#"{"cmd":"finish"}"#), &mut app);
        match resp.payload {
            Payload::Finished {
                translation: Some(t),
                ..
            } => {
                assert!(t[0].abs() < 1e-6);
                assert!((t[1] - 0.9604).abs() < 1e-6);
                assert!((t[2] - 0.5).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_commit_off_track_is_rejected() {
        let mut app = app();
        process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        process_command(cmd(r#"{"cmd":"pointer","x":0.5,"y":0,"z":0.5}"#), &mut app);
        let resp = process_command(cmd(r#"{"cmd":"commit"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Rejected { .. }));
    }

    #[test]
    fn test_cancel_despawns_model() {
        let mut app = app();
        process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        let entity = app.world().resource::<ActiveModel>().0.expect("model spawned");

        let resp = process_command(cmd(r#"{"cmd":"cancel"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Cancelled));
        process_command(cmd(r#"{"cmd":"finish"}"#), &mut app);
        assert!(!app.world().entities().contains(entity));
    }

    #[test]
    fn test_zero_size_bounds_are_still_aligned() {
        let mut app = app();
        process_command(
            cmd(r#"{"cmd":"start","bounds":[[0,-0.5,0],[0,-0.5,0]]}"#),
            &mut app,
        );
        let coordinator = app.world().resource::<PlacementCoordinator>();
        let bounds = coordinator.model().bounds.expect("zero-size bounds are kept");
        assert!(bounds.is_zero_size());
        assert_eq!(coordinator.model().scale, 1.0);

        let resp = process_command(cmd(r#"{"cmd":"pointer","x":0,"y":0,"z":0.5}"#), &mut app);
        match resp.payload {
            Payload::Preview {
                placement: Some(p),
            } => assert!((p.position[1] - (0.958 + 0.5)).abs() < 1e-6, "y={}", p.position[1]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_start_before_finish_keeps_committed_placement() {
        let mut app = app();
        process_command(
            cmd(r#"{"cmd":"start","bounds":[[-0.1,-0.02,-0.3],[0.1,0.2,0.3]],"scale":0.12}"#),
            &mut app,
        );
        let first = app.world().resource::<ActiveModel>().0.expect("model spawned");
        process_command(cmd(r#"{"cmd":"pointer","x":0,"y":0,"z":0.5}"#), &mut app);
        process_command(cmd(r#"{"cmd":"commit"}"#), &mut app);

        let resp = process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Rejected { .. }));
        assert_eq!(app.world().resource::<ActiveModel>().0, Some(first));

        let resp = process_command(cmd(r#"{"cmd":"finish"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Finished { .. }));
        let transform = app.world().get::<Transform>(first).expect("first model alive");
        assert!((transform.translation.z - 0.5).abs() < 1e-6);

        let resp = process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Started { .. }));
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut app = app();
        process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        let resp = process_command(cmd(r#"{"cmd":"start"}"#), &mut app);
        assert!(matches!(resp.payload, Payload::Rejected { .. }));
    }
}
