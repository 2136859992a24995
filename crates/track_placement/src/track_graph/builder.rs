use bevy::prelude::*;

use super::{EdgeId, GraphEdge, GraphNode, NodeId, TrackGraph, TrackGraphError};
use crate::curve::{arc_end_point, flat, ArcDirection, CurveDefinition, FALLBACK_TANGENT};

/// Lays track piece by piece from a moving cursor, the way a layout editor
/// snaps sectional track together.
///
/// Arc end nodes are computed with the same geometry the sampler uses, so
/// every arc built here closes exactly on its declared end node.
#[derive(Debug, Clone)]
pub struct TrackLayoutBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    cursor: NodeId,
    heading: Vec3,
    next_node_id: u32,
    next_edge_id: u32,
}

impl TrackLayoutBuilder {
    /// Start a layout at `origin`, facing `heading` (projected to horizontal).
    pub fn new(origin: Vec3, heading: Vec3) -> Self {
        let heading = flat(heading)
            .try_normalize()
            .map(|h| Vec3::new(h.x, 0.0, h.y))
            .unwrap_or(FALLBACK_TANGENT);
        Self {
            nodes: vec![GraphNode {
                id: NodeId(0),
                position: origin,
            }],
            edges: Vec::new(),
            cursor: NodeId(0),
            heading,
            next_node_id: 1,
            next_edge_id: 0,
        }
    }

    pub fn cursor_node(&self) -> NodeId {
        self.cursor
    }

    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    pub fn cursor_position(&self) -> Vec3 {
        self.position_of(self.cursor)
    }

    fn position_of(&self, id: NodeId) -> Vec3 {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.position)
            .unwrap_or(Vec3::ZERO)
    }

    fn push_piece(&mut self, end: Vec3, heading: Vec3, curve: CurveDefinition) -> EdgeId {
        let end_id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(GraphNode {
            id: end_id,
            position: end,
        });

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(GraphEdge {
            id,
            from: self.cursor,
            to: end_id,
            curve,
        });

        self.cursor = end_id;
        self.heading = heading;
        id
    }

    /// Append a straight piece of `length` along the current heading.
    pub fn straight(&mut self, length: f32) -> EdgeId {
        let end = self.cursor_position() + self.heading * length;
        self.push_piece(end, self.heading, CurveDefinition::Straight)
    }

    /// Append a straight piece that also climbs by `rise`.
    pub fn straight_with_rise(&mut self, length: f32, rise: f32) -> EdgeId {
        let end = self.cursor_position() + self.heading * length + Vec3::Y * rise;
        self.push_piece(end, self.heading, CurveDefinition::Straight)
    }

    /// Append an arc piece turning in `direction`.
    pub fn arc(&mut self, radius: f32, sweep_angle_deg: f32, direction: ArcDirection) -> EdgeId {
        let (end, heading) = arc_end_point(
            self.cursor_position(),
            self.heading,
            radius,
            sweep_angle_deg,
            direction,
            0.0,
        );
        self.push_piece(
            end,
            heading,
            CurveDefinition::Arc {
                radius,
                sweep_angle_deg,
                direction,
            },
        )
    }

    /// Move the cursor back to an existing node, e.g. to lay a branch.
    /// Returns false if the node does not exist.
    pub fn jump_to(&mut self, node: NodeId, heading: Vec3) -> bool {
        if !self.nodes.iter().any(|n| n.id == node) {
            return false;
        }
        self.cursor = node;
        if let Some(h) = flat(heading).try_normalize() {
            self.heading = Vec3::new(h.x, 0.0, h.y);
        }
        true
    }

    pub fn build(self) -> Result<TrackGraph, TrackGraphError> {
        TrackGraph::new(self.nodes, self.edges)
    }
}
