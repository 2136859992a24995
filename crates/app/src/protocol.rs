//! Newline-delimited JSON protocol for the headless placement driver.
//!
//! Each stdin line is one [`Command`] tagged by `"cmd"`; each stdout line is
//! one [`Response`] tagged by `"type"`.

use serde::{Deserialize, Serialize};

use track_placement::{ForwardAxis, PlacementResult, RollingStockType, SegmentRef};

pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Spawn a model and begin placing it.
    Start {
        /// Unscaled local bounds as `[min, max]`. Omit when not measurable.
        #[serde(default)]
        bounds: Option<[[f32; 3]; 2]>,
        #[serde(default)]
        forward_axis: ForwardAxis,
        #[serde(default)]
        hint: Option<String>,
        /// Skip scale classification and use this scale.
        #[serde(default)]
        scale: Option<f32>,
    },
    /// Pointer moved to a world-space position.
    Pointer { x: f32, y: f32, z: f32 },
    Commit,
    Cancel,
    /// Collect the outcome of a finished session.
    Finish,
    Quit,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: Payload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Ready {
        edges: usize,
        strategy: Option<String>,
    },
    Started {
        scale: f32,
        detected_type: Option<RollingStockType>,
        notification: String,
    },
    Preview {
        placement: Option<PlacementReport>,
    },
    Committed {
        placement: PlacementReport,
    },
    Rejected {
        reason: String,
    },
    Cancelled,
    Finished {
        outcome: String,
        /// Final world transform of the model when it was committed.
        translation: Option<[f32; 3]>,
        yaw: Option<f32>,
    },
    Error {
        message: String,
    },
    Goodbye,
}

#[derive(Debug, Serialize)]
pub struct PlacementReport {
    pub position: [f32; 3],
    pub yaw: f32,
    pub is_valid: bool,
    pub segment: String,
    pub t: f32,
    pub distance: f32,
}

impl From<&PlacementResult> for PlacementReport {
    fn from(result: &PlacementResult) -> Self {
        let segment = match result.segment {
            SegmentRef::Edge(id) => id.to_string(),
            SegmentRef::Piece(index) => format!("piece#{index}"),
        };
        Self {
            position: result.position.to_array(),
            yaw: result.yaw,
            is_valid: result.is_valid,
            segment,
            t: result.t,
            distance: result.distance,
        }
    }
}

pub fn response(payload: Payload) -> Response {
    Response {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}
