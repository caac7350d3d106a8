//! Floating overlays drawn on top of the graph canvas: stats, legend,
//! selected-node detail, connect-mode indicator, and the empty-state
//! placeholder.

use egui::{Align2, Color32, FontId, Id, Rect, RichText, Ui};

use playbook_core::{Category, ConfidenceTier};

use crate::scene::SceneNode;
use crate::style::{category_color, tier_color, CENTER_FILL};

const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(28, 38, 54, 235);
const PANEL_STROKE: Color32 = Color32::from_rgb(51, 65, 85);
const MUTED: Color32 = Color32::from_rgb(148, 163, 184);

fn panel_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(PANEL_BG)
        .stroke(egui::Stroke::new(1.0, PANEL_STROKE))
        .corner_radius(6.0)
        .inner_margin(8.0)
}

/// Node/edge counts of the current scene, top-left.
pub fn draw_stats_panel(ui: &mut Ui, graph_rect: Rect, nodes: usize, edges: usize) {
    let pos = graph_rect.left_top() + egui::vec2(10.0, 10.0);
    egui::Area::new(Id::new("graph_stats_panel"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .movable(false)
        .show(ui.ctx(), |ui| {
            panel_frame().show(ui, |ui| {
                ui.label(RichText::new("📊 Knowledge graph").strong().size(12.0));
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("Nodes: {}", nodes)).size(11.0));
                    ui.label(RichText::new(format!("Edges: {}", edges)).size(11.0));
                });
            });
        });
}

/// Detail card for the selected node, top-right. Returns true when the
/// close button was clicked.
pub fn draw_selected_panel(ui: &mut Ui, graph_rect: Rect, node: &SceneNode) -> bool {
    let mut close = false;
    let pos = egui::pos2(graph_rect.right() - 230.0, graph_rect.top() + 10.0);

    egui::Area::new(Id::new("selected_node_panel"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .movable(false)
        .show(ui.ctx(), |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_max_width(210.0);
                ui.label(RichText::new("🔍 Node detail").strong().size(12.0));
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Name:").size(11.0).color(MUTED));
                    ui.label(RichText::new(&node.label).size(11.0));
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Category:").size(11.0).color(MUTED));
                    ui.label(
                        RichText::new(node.category.label())
                            .size(11.0)
                            .color(category_color(node.category)),
                    );
                });
                if node.is_center {
                    ui.label(
                        RichText::new("Center node 🎯")
                            .size(11.0)
                            .color(CENTER_FILL),
                    );
                }
                if ui.small_button("Close").clicked() {
                    close = true;
                }
            });
        });

    close
}

/// Legend of every known category plus the two confidence tiers,
/// bottom-right. Unknown categories never appear here; they render with
/// the fallback color only.
pub fn draw_legend(ui: &mut Ui, graph_rect: Rect) {
    let top = (graph_rect.bottom() - 340.0).max(graph_rect.top() + 130.0);
    let pos = egui::pos2(graph_rect.right() - 190.0, top);

    egui::Area::new(Id::new("graph_legend"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .movable(false)
        .show(ui.ctx(), |ui| {
            panel_frame().show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height((graph_rect.bottom() - top - 16.0).max(120.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new("📌 Legend").strong().size(12.0));

                        ui.label(RichText::new("Node categories").size(10.0).color(MUTED));
                        for category in Category::ALL {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new("■")
                                        .size(11.0)
                                        .color(category_color(category)),
                                );
                                ui.label(RichText::new(category.label()).size(11.0));
                            });
                        }
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("■").size(11.0).color(CENTER_FILL));
                            ui.label(RichText::new("Center node 🎯").size(11.0));
                        });

                        ui.separator();
                        ui.label(RichText::new("Edge confidence").size(10.0).color(MUTED));
                        for tier in [ConfidenceTier::High, ConfidenceTier::Standard] {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new("●").size(11.0).color(tier_color(tier)));
                                ui.label(RichText::new(tier.label()).size(11.0));
                            });
                        }
                    });
            });
        });
}

/// Connect-mode banner, bottom-left.
pub fn draw_connect_indicator(ui: &mut Ui, graph_rect: Rect, pending: bool) {
    let pos = egui::pos2(graph_rect.left() + 10.0, graph_rect.bottom() - 44.0);

    egui::Area::new(Id::new("connect_mode_indicator"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .movable(false)
        .show(ui.ctx(), |ui| {
            egui::Frame::new()
                .fill(Color32::from_rgba_premultiplied(0, 0, 0, 180))
                .corner_radius(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("⊕ CONNECT MODE")
                                .color(Color32::from_rgb(100, 200, 255))
                                .strong(),
                        );
                        let hint = if pending {
                            "  pick the target node"
                        } else {
                            "  click two nodes, Esc to exit"
                        };
                        ui.label(RichText::new(hint).color(Color32::GRAY).small());
                    });
                });
        });
}

/// Placeholder shown while no subgraph has arrived yet.
pub fn draw_empty_state(ui: &mut Ui, graph_rect: Rect) {
    let painter = ui.painter_at(graph_rect);
    painter.rect_filled(graph_rect, 0.0, Color32::from_rgb(15, 23, 42));

    let center = graph_rect.center();
    painter.text(
        center - egui::vec2(0.0, 36.0),
        Align2::CENTER_CENTER,
        "🌐",
        FontId::proportional(40.0),
        MUTED,
    );
    painter.text(
        center,
        Align2::CENTER_CENTER,
        "Waiting for graph data…",
        FontId::proportional(14.0),
        MUTED,
    );
    painter.text(
        center + egui::vec2(0.0, 22.0),
        Align2::CENTER_CENTER,
        "Ask a question and the knowledge graph will appear here",
        FontId::proportional(11.0),
        Color32::from_rgb(100, 116, 139),
    );
}
