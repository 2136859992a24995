//! Read-only track network: nodes at world positions joined by curve edges.
//!
//! The graph is validated once at construction. Afterwards it is never
//! mutated by the placement engine; consumers hold it behind an `Arc`.

mod builder;
mod layout;
#[cfg(test)]
mod tests;
mod types;

pub use builder::TrackLayoutBuilder;
pub use layout::{EdgeRecord, NodeRecord, TrackLayout};
pub use types::{EdgeId, GraphEdge, GraphNode, NodeId, TrackGraphError};

use std::collections::HashMap;

use bevy::prelude::*;

use crate::curve::{sample_curve, CurveSample};

#[derive(Debug, Clone, Default)]
pub struct TrackGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// Start/end positions per edge, parallel to `edges`.
    endpoints: Vec<(Vec3, Vec3)>,
    node_index: HashMap<NodeId, usize>,
    edge_index: HashMap<EdgeId, usize>,
}

impl TrackGraph {
    /// Build a graph, rejecting edges that reference unknown nodes and
    /// duplicate ids.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Result<Self, TrackGraphError> {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id, i).is_some() {
                return Err(TrackGraphError::DuplicateNode(node.id));
            }
        }

        let mut edge_index = HashMap::with_capacity(edges.len());
        let mut endpoints = Vec::with_capacity(edges.len());
        for (i, edge) in edges.iter().enumerate() {
            if edge_index.insert(edge.id, i).is_some() {
                return Err(TrackGraphError::DuplicateEdge(edge.id));
            }
            let lookup = |id: NodeId| {
                node_index
                    .get(&id)
                    .map(|&idx| nodes[idx].position)
                    .ok_or(TrackGraphError::InvalidEdge {
                        edge: edge.id,
                        missing_node: id,
                    })
            };
            endpoints.push((lookup(edge.from)?, lookup(edge.to)?));
        }

        Ok(Self {
            nodes,
            edges,
            endpoints,
            node_index,
            edge_index,
        })
    }

    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edge_index.get(&id).map(|&i| &self.edges[i])
    }

    pub fn all_nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn all_edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when there is no track to place onto.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every edge together with its resolved start and end positions.
    pub fn edges_with_endpoints(&self) -> impl Iterator<Item = (&GraphEdge, Vec3, Vec3)> + '_ {
        self.edges
            .iter()
            .zip(self.endpoints.iter())
            .map(|(edge, &(start, end))| (edge, start, end))
    }

    /// Edges that start or end at `node`.
    pub fn edges_at_node(&self, node: NodeId) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.from == node || e.to == node)
    }

    /// Sample an edge of this graph at parameter `t`.
    pub fn sample_edge(&self, id: EdgeId, t: f32) -> Option<CurveSample> {
        let &i = self.edge_index.get(&id)?;
        let (start, end) = self.endpoints[i];
        Some(sample_curve(start, end, &self.edges[i].curve, t))
    }

    /// Horizontal length of an edge.
    pub fn edge_length(&self, id: EdgeId) -> Option<f32> {
        let &i = self.edge_index.get(&id)?;
        let (start, end) = self.endpoints[i];
        Some(self.edges[i].curve.horizontal_length(start, end))
    }

    /// Total horizontal length of all track in the graph.
    pub fn total_length(&self) -> f32 {
        self.edges_with_endpoints()
            .map(|(edge, start, end)| edge.curve.horizontal_length(start, end))
            .sum()
    }
}
