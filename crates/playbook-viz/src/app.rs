//! Main application state and frame loop.

use eframe::{App, CreationContext};
use egui::{Context, Key, RichText};
use tracing::{debug, info};

use playbook_core::{select_center_first, ConfidenceTier, Subgraph};

use crate::chat::{wire_history, ChatMessage, ChatPanel};
use crate::client::{ChatClient, ChatEvent, ChatResponse};
use crate::graph_view::{self, ConnectState};
use crate::overlays;
use crate::sample::sample_subgraph;
use crate::scene::{Camera, GraphScene};
use crate::settings::{SettingsNavigation, SettingsStyle};
use crate::style::{EdgeFlowState, SELECTION_COLOR};

/// The viewer application: conversation on the left, the answer's
/// subgraph in the center.
pub struct PlaybookApp {
    /// Conversation transcript, oldest first.
    messages: Vec<ChatMessage>,
    /// Chat panel widget state.
    chat_panel: ChatPanel,
    /// Backend client, one request in flight at most.
    client: ChatClient,
    /// Scene for the active subgraph; `None` until the first answer
    /// carries one.
    scene: Option<GraphScene>,
    /// Monotonic replacement counter.
    scene_version: u64,
    /// Viewport camera.
    camera: Camera,
    /// Fit the camera to the scene on the next frame.
    fit_pending: bool,
    /// Currently selected node index, cleared on scene replacement.
    selected: Option<usize>,
    /// Connect (annotation edge) interaction state.
    connect: ConnectState,
    /// Phase for the high-confidence edge animation.
    flow: EdgeFlowState,
    /// Navigation settings.
    nav: SettingsNavigation,
    /// Style settings.
    style: SettingsStyle,
    /// Whether the chat panel is visible (Tab toggles).
    show_chat: bool,
}

impl PlaybookApp {
    pub fn new(cc: &CreationContext<'_>, backend_url: String) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            messages: Vec::new(),
            chat_panel: ChatPanel::default(),
            client: ChatClient::new(backend_url),
            scene: None,
            scene_version: 0,
            camera: Camera::default(),
            fit_pending: false,
            selected: None,
            connect: ConnectState::default(),
            flow: EdgeFlowState::default(),
            nav: SettingsNavigation::default(),
            style: SettingsStyle::default(),
            show_chat: true,
        }
    }

    fn send_question(&mut self, question: String) {
        self.messages.push(ChatMessage::user(question));
        self.client.send(wire_history(&self.messages));
    }

    fn apply_answer(&mut self, response: ChatResponse) {
        let subgraph = response.graph_data.map(Subgraph::from_payload);
        self.messages
            .push(ChatMessage::assistant(response.message, response.search_process));

        // An answer without graph data keeps the previous subgraph on
        // screen (stale-while-revalidate).
        if let Some(subgraph) = subgraph {
            self.replace_subgraph(subgraph);
        }
    }

    /// Atomically replace the active subgraph. Positions, styles, and
    /// selection state are all derived from scratch; nothing from the
    /// previous scene survives.
    fn replace_subgraph(&mut self, subgraph: Subgraph) {
        self.scene_version += 1;
        self.selected = None;
        self.connect.pending_source = None;

        if subgraph.is_empty() {
            self.scene = None;
            return;
        }

        info!(
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            version = self.scene_version,
            "subgraph replaced"
        );
        self.scene = Some(GraphScene::build(
            &subgraph,
            select_center_first,
            self.scene_version,
        ));
        self.fit_pending = self.nav.fit_on_replace;
    }

    fn scene_has_animated_edges(&self) -> bool {
        self.scene
            .as_ref()
            .map(|scene| {
                scene.edges.iter().any(|e| {
                    e.endpoints.is_some() && e.relation.tier() == ConfidenceTier::High
                })
            })
            .unwrap_or(false)
    }

    fn toolbar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("◈").size(18.0).color(SELECTION_COLOR));
                ui.label(RichText::new("Playbook").strong().size(14.0));
                ui.separator();

                if ui
                    .selectable_label(!self.connect.active, "↔ pan")
                    .on_hover_text("Drag to pan, scroll to zoom")
                    .clicked()
                {
                    self.connect.exit();
                }
                if ui
                    .selectable_label(self.connect.active, "⊕ connect")
                    .on_hover_text("Draw an annotation edge between two nodes (C)")
                    .clicked()
                {
                    self.connect.toggle();
                }

                ui.separator();
                if ui.button("⛶ Fit").on_hover_text("Fit graph to view").clicked() {
                    self.fit_pending = true;
                }
                if ui
                    .button("📄 Sample")
                    .on_hover_text("Load the built-in sample subgraph")
                    .clicked()
                {
                    self.replace_subgraph(sample_subgraph());
                }

                ui.separator();
                ui.checkbox(&mut self.style.show_edge_labels, "edge labels");
                ui.checkbox(&mut self.style.animate_high_confidence, "animate");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.client.is_pending() {
                        ui.spinner();
                    }
                    ui.label(
                        RichText::new(self.client.backend_url().to_string())
                            .size(11.0)
                            .color(egui::Color32::GRAY),
                    );
                });
            });
        });
    }
}

impl App for PlaybookApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        // Finished chat requests arrive through the client channel.
        if let Some(event) = self.client.poll() {
            match event {
                ChatEvent::Answered(response) => self.apply_answer(response),
                ChatEvent::Failed(error) => self
                    .messages
                    .push(ChatMessage::assistant(format!("⚠️ {}", error), None)),
            }
        }
        // Keep polling while a request is pending.
        if self.client.is_pending() {
            ctx.request_repaint();
        }

        // Advance the edge flow animation.
        let dt = ctx.input(|i| i.stable_dt);
        self.flow.enabled = self.style.animate_high_confidence;
        self.flow.tick(dt);
        if self.style.animate_high_confidence && self.scene_has_animated_edges() {
            ctx.request_repaint();
        }

        // Keyboard shortcuts; skip while a text field owns the keyboard.
        let typing = ctx.wants_keyboard_input();
        ctx.input(|i| {
            if !typing {
                if i.key_pressed(Key::Tab) {
                    self.show_chat = !self.show_chat;
                }
                if i.key_pressed(Key::C) {
                    self.connect.toggle();
                }
            }
            if i.key_pressed(Key::Escape) && self.connect.active {
                self.connect.exit();
            }
        });

        self.toolbar(ctx);

        if self.show_chat {
            egui::SidePanel::left("chat_panel")
                .resizable(true)
                .default_width(400.0)
                .min_width(300.0)
                .show(ctx, |ui| {
                    let pending = self.client.is_pending();
                    if let Some(question) = self.chat_panel.show(ui, &self.messages, pending) {
                        self.send_question(question);
                    }
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let graph_rect = ui.available_rect_before_wrap();

                match &mut self.scene {
                    Some(scene) => {
                        if self.fit_pending {
                            if let Some(bounds) = scene.bounding_rect() {
                                self.camera.fit(graph_rect, bounds);
                            }
                            self.fit_pending = false;
                        }

                        let response = graph_view::show(
                            ui,
                            scene,
                            &mut self.camera,
                            &mut self.connect,
                            self.selected,
                            &self.flow,
                            &self.nav,
                            &self.style,
                        );
                        if let Some(idx) = response.clicked {
                            let node = &scene.nodes[idx];
                            debug!(id = %node.id, category = node.category.label(), "node selected");
                            self.selected = Some(idx);
                        }

                        overlays::draw_stats_panel(
                            ui,
                            graph_rect,
                            scene.node_count(),
                            scene.edge_count(),
                        );
                        overlays::draw_legend(ui, graph_rect);
                        if let Some(idx) = self.selected {
                            if overlays::draw_selected_panel(ui, graph_rect, &scene.nodes[idx]) {
                                self.selected = None;
                            }
                        }
                        if self.connect.active {
                            overlays::draw_connect_indicator(
                                ui,
                                graph_rect,
                                self.connect.pending_source.is_some(),
                            );
                        }
                    }
                    None => overlays::draw_empty_state(ui, graph_rect),
                }
            });
    }
}
