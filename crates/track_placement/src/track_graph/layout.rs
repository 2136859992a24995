use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{EdgeId, GraphEdge, GraphNode, NodeId, TrackGraph, TrackGraphError};
use crate::curve::CurveDefinition;
use crate::params::ConfigError;

/// Serializable node entry of a [`TrackLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub position: [f32; 3],
}

/// Serializable edge entry of a [`TrackLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: u32,
    pub from: u32,
    pub to: u32,
    pub curve: CurveDefinition,
}

/// Plain-data form of a track network, as handed over by the track authoring side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl TrackLayout {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot an existing graph.
    pub fn from_graph(graph: &TrackGraph) -> Self {
        Self {
            nodes: graph
                .all_nodes()
                .iter()
                .map(|n| NodeRecord {
                    id: n.id.0,
                    position: n.position.to_array(),
                })
                .collect(),
            edges: graph
                .all_edges()
                .iter()
                .map(|e| EdgeRecord {
                    id: e.id.0,
                    from: e.from.0,
                    to: e.to.0,
                    curve: e.curve,
                })
                .collect(),
        }
    }

    pub fn into_graph(self) -> Result<TrackGraph, TrackGraphError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| GraphNode {
                id: NodeId(n.id),
                position: Vec3::from_array(n.position),
            })
            .collect();
        let edges = self
            .edges
            .into_iter()
            .map(|e| GraphEdge {
                id: EdgeId(e.id),
                from: NodeId(e.from),
                to: NodeId(e.to),
                curve: e.curve,
            })
            .collect();
        TrackGraph::new(nodes, edges)
    }
}

impl TrackGraph {
    pub fn from_layout(layout: TrackLayout) -> Result<Self, TrackGraphError> {
        layout.into_graph()
    }
}
