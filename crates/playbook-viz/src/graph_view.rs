//! Graph canvas: painting, hit testing, pan/zoom, and the connect
//! interaction.
//!
//! The canvas draws one [`GraphScene`] snapshot. All geometry is derived
//! per frame from the camera; nothing is cached between frames, so a
//! scene replacement needs no invalidation beyond swapping the scene.

use std::sync::Arc;

use egui::{pos2, vec2, Color32, FontId, Galley, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui};

use crate::scene::{Camera, GraphScene, SceneNode};
use crate::settings::{SettingsNavigation, SettingsStyle};
use crate::style::{
    annotation_edge_visuals, resolve_edge_visuals, resolve_node_visuals, EdgeFlowState,
    EdgeVisualContext, EdgeVisuals, NodeVisualContext, SELECTION_COLOR,
};

const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
const GRID_DOT: Color32 = Color32::from_rgba_premultiplied(17, 20, 25, 60);
const LABEL_TEXT: Color32 = Color32::from_rgb(226, 232, 240);
const LABEL_CHIP: Color32 = Color32::from_rgba_premultiplied(27, 37, 53, 230);
const FLOW_DASH: Color32 = Color32::from_rgba_premultiplied(150, 150, 150, 150);
const CATEGORY_TAG_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 80);

/// Two-click edge drawing state.
#[derive(Debug, Default, Clone)]
pub struct ConnectState {
    /// Whether connect mode is on (toolbar toggle or `C`).
    pub active: bool,
    /// First clicked node, waiting for the second.
    pub pending_source: Option<usize>,
}

impl ConnectState {
    pub fn toggle(&mut self) {
        self.active = !self.active;
        self.pending_source = None;
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.pending_source = None;
    }
}

/// What the canvas reports back to the orchestrator each frame.
#[derive(Debug, Default)]
pub struct GraphResponse {
    /// Node index selected by a click this frame.
    pub clicked: Option<usize>,
}

/// Per-frame screen geometry of one node card.
struct NodeCard {
    rect: Rect,
    label: Arc<Galley>,
    category: Arc<Galley>,
}

/// Draw the scene and handle interaction. Returns the clicked node, if
/// any.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut Ui,
    scene: &mut GraphScene,
    camera: &mut Camera,
    connect: &mut ConnectState,
    selected: Option<usize>,
    flow: &EdgeFlowState,
    nav: &SettingsNavigation,
    style: &SettingsStyle,
) -> GraphResponse {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, Sense::click_and_drag());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, BACKGROUND);
    if style.show_grid {
        draw_grid(&painter, rect, camera);
    }

    // Pan with a background drag; connect mode reserves the pointer for
    // picking nodes.
    if !connect.active && response.dragged() {
        camera.pan(response.drag_delta());
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let factor = (scroll * nav.zoom_speed).exp();
            let anchor = response.hover_pos().unwrap_or_else(|| rect.center());
            camera.zoom_about(rect, anchor, factor);
        }
    }

    let zoom = camera.zoom;
    let cards = layout_node_cards(&painter, scene, camera, rect, selected, zoom);

    // Edges first so the cards cover their endpoints.
    for edge in &scene.edges {
        let Some((source, target)) = edge.endpoints else {
            continue;
        };
        let visuals = resolve_edge_visuals(EdgeVisualContext {
            tier: edge.relation.tier(),
            center_adjacent: edge.center_adjacent,
        });
        let label = style
            .show_edge_labels
            .then(|| edge.relation.display_label());
        draw_edge(
            &painter,
            &cards[source],
            &cards[target],
            visuals,
            label,
            flow,
            style.animate_high_confidence,
            zoom,
        );
    }
    for &(a, b) in &scene.annotations {
        draw_edge(
            &painter,
            &cards[a],
            &cards[b],
            annotation_edge_visuals(),
            None,
            flow,
            false,
            zoom,
        );
    }

    // Rubber band from the pending source to the pointer.
    if connect.active {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        if let (Some(source), Some(pointer)) = (connect.pending_source, response.hover_pos()) {
            painter.line_segment(
                [cards[source].rect.center(), pointer],
                Stroke::new(1.5, SELECTION_COLOR),
            );
        }
    }

    // Cards, center last so the focal term stays on top.
    for (i, node) in scene.nodes.iter().enumerate() {
        if !node.is_center {
            draw_node(&painter, node, &cards[i], selected == Some(i), zoom);
        }
    }
    for (i, node) in scene.nodes.iter().enumerate() {
        if node.is_center {
            draw_node(&painter, node, &cards[i], selected == Some(i), zoom);
        }
    }

    let mut out = GraphResponse::default();
    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let hit = cards.iter().rposition(|c| c.rect.contains(pointer));
            match (hit, connect.active) {
                (Some(idx), true) => match connect.pending_source {
                    None => connect.pending_source = Some(idx),
                    Some(source) if source != idx => {
                        scene.add_annotation(source, idx);
                        connect.pending_source = None;
                    }
                    Some(_) => connect.pending_source = None,
                },
                (Some(idx), false) => out.clicked = Some(idx),
                (None, true) => connect.pending_source = None,
                (None, false) => {}
            }
        }
    }

    out
}

fn layout_node_cards(
    painter: &egui::Painter,
    scene: &GraphScene,
    camera: &Camera,
    rect: Rect,
    selected: Option<usize>,
    zoom: f32,
) -> Vec<NodeCard> {
    scene
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let visuals = resolve_node_visuals(NodeVisualContext {
                category: node.category,
                is_center: node.is_center,
                selected: selected == Some(i),
            });

            let label_text = if node.is_center {
                format!("🎯 {}", node.label)
            } else {
                node.label.clone()
            };
            let label_size = if node.is_center { 14.0 } else { 13.0 };
            let label = painter.layout_no_wrap(
                label_text,
                FontId::proportional(label_size * zoom),
                Color32::WHITE,
            );
            let category = painter.layout_no_wrap(
                node.category.label().to_string(),
                FontId::proportional(11.0 * zoom),
                LABEL_TEXT,
            );

            let pad = 12.0 * zoom;
            let width = (visuals.min_width * zoom)
                .max(label.size().x + 2.0 * pad)
                .max(category.size().x + 2.0 * pad);
            let height = label.size().y + category.size().y + 2.4 * pad;
            let center = camera.to_screen(rect, node.pos);

            NodeCard {
                rect: Rect::from_center_size(center, vec2(width, height)),
                label,
                category,
            }
        })
        .collect()
}

fn draw_node(painter: &egui::Painter, node: &SceneNode, card: &NodeCard, selected: bool, zoom: f32) {
    let visuals = resolve_node_visuals(NodeVisualContext {
        category: node.category,
        is_center: node.is_center,
        selected,
    });

    if visuals.glow {
        painter.rect_filled(
            card.rect.expand(7.0 * zoom),
            14.0 * zoom,
            Color32::from_rgba_unmultiplied(245, 158, 11, 60),
        );
    }

    let rounding = 10.0 * zoom;
    painter.rect_filled(card.rect, rounding, visuals.fill);
    painter.rect_stroke(
        card.rect,
        rounding,
        Stroke::new(visuals.stroke.width * zoom.max(0.5), visuals.stroke.color),
        StrokeKind::Outside,
    );

    let pad = 6.0 * zoom;
    let label_pos = pos2(
        card.rect.center().x - card.label.size().x / 2.0,
        card.rect.top() + pad,
    );
    painter.galley(label_pos, card.label.clone(), Color32::WHITE);

    let tag_size = card.category.size() + vec2(10.0 * zoom, 3.0 * zoom);
    let tag_rect = Rect::from_center_size(
        pos2(
            card.rect.center().x,
            card.rect.bottom() - pad - tag_size.y / 2.0,
        ),
        tag_size,
    );
    painter.rect_filled(tag_rect, 4.0 * zoom, CATEGORY_TAG_BG);
    let category_pos = pos2(
        tag_rect.center().x - card.category.size().x / 2.0,
        tag_rect.center().y - card.category.size().y / 2.0,
    );
    painter.galley(category_pos, card.category.clone(), LABEL_TEXT);
}

#[allow(clippy::too_many_arguments)]
fn draw_edge(
    painter: &egui::Painter,
    from: &NodeCard,
    to: &NodeCard,
    visuals: EdgeVisuals,
    label: Option<String>,
    flow: &EdgeFlowState,
    animate: bool,
    zoom: f32,
) {
    if from.rect.intersects(to.rect) {
        return;
    }

    let a = rect_exit_point(from.rect, to.rect.center());
    let b = rect_exit_point(to.rect, from.rect.center());
    let span = b - a;
    let length = span.length();
    if length < 1.0 {
        return;
    }
    let dir = span / length;

    let width = visuals.stroke.width * zoom.max(0.4);
    let arrow_len = visuals.arrow_size * zoom;
    let shaft_end = b - dir * arrow_len;

    painter.line_segment([a, shaft_end], Stroke::new(width, visuals.stroke.color));

    // Arrowhead: closed triangle at the target boundary.
    let perp = vec2(-dir.y, dir.x) * arrow_len * 0.45;
    painter.add(Shape::convex_polygon(
        vec![b, shaft_end + perp, shaft_end - perp],
        visuals.stroke.color,
        Stroke::NONE,
    ));

    if animate && visuals.animated {
        draw_flow_dashes(painter, a, shaft_end, width, flow, zoom);
    }

    if let Some(text) = label {
        let galley = painter.layout_no_wrap(text, FontId::proportional(11.0 * zoom), LABEL_TEXT);
        let mid = a + span / 2.0;
        let chip = Rect::from_center_size(mid, galley.size() + vec2(12.0 * zoom, 6.0 * zoom));
        painter.rect_filled(chip, 4.0 * zoom, LABEL_CHIP);
        let text_pos = pos2(
            chip.center().x - galley.size().x / 2.0,
            chip.center().y - galley.size().y / 2.0,
        );
        painter.galley(text_pos, galley, LABEL_TEXT);
    }
}

/// Marching dashes overlaid on an animated edge.
fn draw_flow_dashes(
    painter: &egui::Painter,
    a: Pos2,
    b: Pos2,
    width: f32,
    flow: &EdgeFlowState,
    zoom: f32,
) {
    let dash = 6.0 * zoom;
    let gap = 9.0 * zoom;
    let period = dash + gap;
    let span = b - a;
    let length = span.length();
    if length <= period {
        return;
    }
    let dir = span / length;

    let mut start = flow.dash_offset(period) - period;
    while start < length {
        let s = start.max(0.0);
        let e = (start + dash).min(length);
        if e > s {
            painter.line_segment([a + dir * s, a + dir * e], Stroke::new(width, FLOW_DASH));
        }
        start += period;
    }
}

/// Point where the segment from the rect's center toward `target` crosses
/// the rect boundary. Falls back to the center for degenerate input.
fn rect_exit_point(rect: Rect, target: Pos2) -> Pos2 {
    let from = rect.center();
    let d = target - from;

    let mut t = f32::INFINITY;
    if d.x > 0.0 {
        t = t.min((rect.max.x - from.x) / d.x);
    } else if d.x < 0.0 {
        t = t.min((rect.min.x - from.x) / d.x);
    }
    if d.y > 0.0 {
        t = t.min((rect.max.y - from.y) / d.y);
    } else if d.y < 0.0 {
        t = t.min((rect.min.y - from.y) / d.y);
    }

    if !t.is_finite() {
        return from;
    }
    from + d * t.clamp(0.0, 1.0)
}

fn draw_grid(painter: &egui::Painter, rect: Rect, camera: &Camera) {
    let spacing = 24.0 * camera.zoom;
    if spacing < 8.0 {
        return;
    }

    let origin = camera.to_screen(rect, Pos2::ZERO);
    let first_x = origin.x - ((origin.x - rect.left()) / spacing).ceil() * spacing;
    let first_y = origin.y - ((origin.y - rect.top()) / spacing).ceil() * spacing;

    let mut y = first_y;
    while y <= rect.bottom() {
        let mut x = first_x;
        while x <= rect.right() {
            painter.circle_filled(pos2(x, y), 1.0, GRID_DOT);
            x += spacing;
        }
        y += spacing;
    }
}
