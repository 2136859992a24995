use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::CurveDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// A track junction or piece boundary at a fixed world position.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Vec3,
}

/// A piece of track between two nodes. Pure data.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub curve: CurveDefinition,
}

/// Structural violations detected while building a [`TrackGraph`](super::TrackGraph).
#[derive(Debug, Clone, PartialEq)]
pub enum TrackGraphError {
    /// An edge references a node that is not part of the graph.
    InvalidEdge { edge: EdgeId, missing_node: NodeId },
    /// Two nodes share the same id.
    DuplicateNode(NodeId),
    /// Two edges share the same id.
    DuplicateEdge(EdgeId),
}

impl fmt::Display for TrackGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackGraphError::InvalidEdge { edge, missing_node } => {
                write!(f, "Invalid edge: {edge} references missing {missing_node}")
            }
            TrackGraphError::DuplicateNode(id) => write!(f, "Duplicate node id: {id}"),
            TrackGraphError::DuplicateEdge(id) => write!(f, "Duplicate edge id: {id}"),
        }
    }
}

impl std::error::Error for TrackGraphError {}
