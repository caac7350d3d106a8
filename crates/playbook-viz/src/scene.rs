//! Immutable per-subgraph scene snapshot and the viewport camera.
//!
//! A [`GraphScene`] is rebuilt wholesale every time a new answer replaces
//! the active subgraph; nothing from the previous scene survives. The only
//! mutation a scene accepts afterwards is the user drawing annotation
//! edges on top of it.

use std::collections::HashMap;

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use playbook_core::{
    layout_subgraph, Category, CenterSelector, RelationEdge, Subgraph,
};

/// A term with everything the canvas needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub pos: Pos2,
    pub is_center: bool,
}

/// A relation with its endpoints resolved against the node list.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub relation: RelationEdge,
    /// Indices into the scene's node list. `None` when an endpoint id is
    /// missing from the node set — the edge is kept (it counts in the
    /// stats) but draws no visible connection.
    pub endpoints: Option<(usize, usize)>,
    /// Whether either endpoint is the center node.
    pub center_adjacent: bool,
}

/// One rendered subgraph: placed nodes, resolved edges, and any
/// annotation edges the user has drawn since this scene replaced the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct GraphScene {
    /// Replacement identity; bumped on every rebuild.
    pub version: u64,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    /// Client-side only; never sent anywhere.
    pub annotations: Vec<(usize, usize)>,
}

impl GraphScene {
    /// Lay out and resolve a subgraph into a fresh scene.
    pub fn build(subgraph: &Subgraph, select_center: CenterSelector, version: u64) -> GraphScene {
        let placed = layout_subgraph(subgraph, select_center);

        let nodes: Vec<SceneNode> = placed
            .into_iter()
            .map(|p| SceneNode {
                id: p.node.id,
                label: p.node.label,
                category: p.node.category,
                pos: pos2(p.pos.x, p.pos.y),
                is_center: p.is_center,
            })
            .collect();

        // First occurrence wins for duplicate ids.
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            index_of.entry(node.id.as_str()).or_insert(i);
        }
        let center_id = nodes
            .iter()
            .find(|n| n.is_center)
            .map(|n| n.id.clone());

        let edges = subgraph
            .edges
            .iter()
            .map(|relation| {
                let endpoints = match (
                    index_of.get(relation.source.as_str()),
                    index_of.get(relation.target.as_str()),
                ) {
                    (Some(&source), Some(&target)) => Some((source, target)),
                    _ => None,
                };
                let center_adjacent = center_id
                    .as_deref()
                    .map(|c| relation.touches(c))
                    .unwrap_or(false);
                SceneEdge {
                    relation: relation.clone(),
                    endpoints,
                    center_adjacent,
                }
            })
            .collect();

        GraphScene {
            version,
            nodes,
            edges,
            annotations: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edge count as reported in the stats panel. Annotation edges are
    /// part of the current view, so they count too.
    pub fn edge_count(&self) -> usize {
        self.edges.len() + self.annotations.len()
    }

    /// Add a user-drawn edge between two existing nodes. Self-loops and
    /// duplicates are ignored.
    pub fn add_annotation(&mut self, a: usize, b: usize) {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return;
        }
        if self.annotations.contains(&(a, b)) {
            return;
        }
        self.annotations.push((a, b));
    }

    /// Bounding box of all node positions, for view fitting.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.nodes.first()?;
        let mut rect = Rect::from_min_max(first.pos, first.pos);
        for node in &self.nodes[1..] {
            rect.extend_with(node.pos);
        }
        Some(rect)
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Hard zoom bounds for manual zooming.
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 2.0;

/// Fit-to-view parameters: padding fraction around the content and the
/// zoom range auto-fit is allowed to land in.
pub const FIT_PADDING: f32 = 0.2;
pub const FIT_MIN_ZOOM: f32 = 0.5;
pub const FIT_MAX_ZOOM: f32 = 1.5;

/// Maps layout space to screen space: `focus` is the layout point shown
/// at the viewport center, `zoom` the scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub focus: Pos2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focus: Pos2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn to_screen(&self, viewport: Rect, layout: Pos2) -> Pos2 {
        viewport.center() + (layout - self.focus) * self.zoom
    }

    pub fn to_layout(&self, viewport: Rect, screen: Pos2) -> Pos2 {
        self.focus + (screen - viewport.center()) / self.zoom
    }

    /// Pan by a screen-space delta (drag).
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.focus -= screen_delta / self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping the layout point under
    /// `screen_anchor` fixed. The zoom is clamped to the hard bounds.
    pub fn zoom_about(&mut self, viewport: Rect, screen_anchor: Pos2, factor: f32) {
        let anchor = self.to_layout(viewport, screen_anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.focus = anchor - (screen_anchor - viewport.center()) / self.zoom;
    }

    /// Center and scale so `bounds` fills the viewport with padding.
    pub fn fit(&mut self, viewport: Rect, bounds: Rect) {
        self.focus = bounds.center();

        let padded = bounds.expand2(vec2(
            (bounds.width() * FIT_PADDING).max(40.0),
            (bounds.height() * FIT_PADDING).max(40.0),
        ));
        let zoom_x = viewport.width() / padded.width().max(1.0);
        let zoom_y = viewport.height() / padded.height().max(1.0);
        self.zoom = zoom_x.min(zoom_y).clamp(FIT_MIN_ZOOM, FIT_MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_core::{select_center_first, TermNode};

    fn subgraph(ids: &[&str], edges: &[(&str, &str, f32)]) -> Subgraph {
        Subgraph {
            nodes: ids
                .iter()
                .map(|id| TermNode {
                    id: id.to_string(),
                    label: id.to_uppercase(),
                    category: Category::Resource,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(s, t, c)| RelationEdge {
                    source: s.to_string(),
                    target: t.to_string(),
                    label: "related_to".to_string(),
                    confidence: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn single_node_scene_reports_one_node_zero_edges() {
        let scene = GraphScene::build(
            &subgraph(&["clover"], &[]),
            select_center_first,
            1,
        );
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.edge_count(), 0);
        assert!(scene.nodes[0].is_center);
        assert_eq!(scene.nodes[0].pos, Pos2::ZERO);
    }

    #[test]
    fn rebuild_replaces_everything() {
        let first = GraphScene::build(
            &subgraph(&["a", "b", "c"], &[("a", "b", 1.0)]),
            select_center_first,
            1,
        );
        let second = GraphScene::build(
            &subgraph(&["x", "y"], &[]),
            select_center_first,
            2,
        );

        assert_eq!(second.version, 2);
        assert_eq!(second.node_count(), 2);
        for node in &second.nodes {
            assert!(!first.nodes.iter().any(|n| n.id == node.id));
        }
        assert!(second.edges.is_empty());
        assert!(second.annotations.is_empty());
    }

    #[test]
    fn dangling_edges_are_kept_but_unresolved() {
        let scene = GraphScene::build(
            &subgraph(&["a", "b"], &[("a", "ghost", 0.8)]),
            select_center_first,
            1,
        );
        assert_eq!(scene.edge_count(), 1);
        assert_eq!(scene.edges[0].endpoints, None);
        // "a" is the center, so the edge is still center-adjacent.
        assert!(scene.edges[0].center_adjacent);
    }

    #[test]
    fn center_adjacency_follows_center_id() {
        let scene = GraphScene::build(
            &subgraph(
                &["hub", "a", "b"],
                &[("hub", "a", 0.95), ("a", "b", 0.95)],
            ),
            select_center_first,
            1,
        );
        assert!(scene.edges[0].center_adjacent);
        assert!(!scene.edges[1].center_adjacent);
    }

    #[test]
    fn annotations_count_and_dedupe() {
        let mut scene = GraphScene::build(
            &subgraph(&["a", "b", "c"], &[]),
            select_center_first,
            1,
        );
        scene.add_annotation(0, 1);
        scene.add_annotation(0, 1);
        scene.add_annotation(1, 1);
        scene.add_annotation(0, 9);
        assert_eq!(scene.annotations.len(), 1);
        assert_eq!(scene.edge_count(), 1);
    }

    #[test]
    fn high_confidence_center_edge_gets_the_heavy_animated_style() {
        use crate::style::{resolve_edge_visuals, tier_color, EdgeVisualContext};
        use playbook_core::ConfidenceTier;

        let scene = GraphScene::build(
            &subgraph(
                &["n0", "n1", "n2", "n3", "n4"],
                &[("n0", "n3", 0.95)],
            ),
            select_center_first,
            1,
        );

        let edge = &scene.edges[0];
        assert_eq!(edge.endpoints, Some((0, 3)));
        assert!(edge.center_adjacent);
        assert_eq!(edge.relation.tier(), ConfidenceTier::High);
        assert_eq!(edge.relation.display_label(), "related_to (95%)");

        let visuals = resolve_edge_visuals(EdgeVisualContext {
            tier: edge.relation.tier(),
            center_adjacent: edge.center_adjacent,
        });
        assert!(visuals.animated);
        assert_eq!(visuals.stroke.width, 3.0);
        assert_eq!(visuals.stroke.color, tier_color(ConfidenceTier::High));
    }

    #[test]
    fn camera_zoom_clamps_and_anchors() {
        let viewport = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let mut camera = Camera::default();

        camera.zoom_about(viewport, viewport.center(), 100.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.zoom_about(viewport, viewport.center(), 1e-6);
        assert_eq!(camera.zoom, MIN_ZOOM);

        // Zooming about the viewport center keeps the focus fixed.
        let mut camera = Camera::default();
        camera.zoom_about(viewport, viewport.center(), 1.5);
        assert!((camera.focus.x - 0.0).abs() < 1e-3);
        assert!((camera.focus.y - 0.0).abs() < 1e-3);
    }

    #[test]
    fn fit_centers_content_within_zoom_bounds() {
        let viewport = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let scene = GraphScene::build(
            &subgraph(&["a", "b", "c", "d", "e"], &[]),
            select_center_first,
            1,
        );
        let mut camera = Camera::default();
        camera.fit(viewport, scene.bounding_rect().unwrap());

        assert!(camera.zoom >= FIT_MIN_ZOOM && camera.zoom <= FIT_MAX_ZOOM);
        let center = scene.bounding_rect().unwrap().center();
        assert!((camera.focus.x - center.x).abs() < 1e-3);
        assert!((camera.focus.y - center.y).abs() < 1e-3);
    }
}
