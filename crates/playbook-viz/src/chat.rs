//! Chat transcript panel: message bubbles, search-process disclosure,
//! suggested questions, and the input row.

use egui::{Color32, CollapsingHeader, Key, RichText, ScrollArea, TextEdit, Ui};

use playbook_core::Category;

use crate::client::{ChatTurn, SearchProcess};
use crate::style::category_color;

const USER_BUBBLE: Color32 = Color32::from_rgb(37, 99, 235);
const ASSISTANT_BUBBLE: Color32 = Color32::from_rgb(30, 41, 59);
const MUTED: Color32 = Color32::from_rgb(148, 163, 184);

const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What is Clover used for?",
    "What is the Poko Forest League?",
    "What rewards does Adventure chapter 81 give?",
    "What are event stages?",
];

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role string on the wire.
    pub fn wire(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation transcript.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub search_process: Option<SearchProcess>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            search_process: None,
        }
    }

    pub fn assistant(content: impl Into<String>, search_process: Option<SearchProcess>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            search_process,
        }
    }
}

/// Transcript mapped to the wire shape the backend expects.
pub fn wire_history(messages: &[ChatMessage]) -> Vec<ChatTurn> {
    messages
        .iter()
        .map(|m| ChatTurn {
            role: m.role.wire().to_string(),
            content: m.content.clone(),
        })
        .collect()
}

/// Chat panel state: just the draft input; the transcript lives in the
/// app.
#[derive(Default)]
pub struct ChatPanel {
    input: String,
}

impl ChatPanel {
    /// Render the panel. Returns a question the user submitted this
    /// frame, if any.
    pub fn show(&mut self, ui: &mut Ui, messages: &[ChatMessage], loading: bool) -> Option<String> {
        let mut outgoing: Option<String> = None;

        ui.label(RichText::new("💬 Playbook").strong().size(16.0));
        ui.label(
            RichText::new("Ask about a game term; answers come from the knowledge graph.")
                .size(11.0)
                .color(MUTED),
        );
        ui.separator();

        let input_height = if messages.is_empty() { 110.0 } else { 54.0 };
        let scroll_height = (ui.available_height() - input_height).max(60.0);

        ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .max_height(scroll_height)
            .show(ui, |ui| {
                if messages.is_empty() {
                    ui.add_space(24.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("🤖").size(40.0));
                        ui.label(RichText::new("Ask a question").size(14.0).color(MUTED));
                        ui.label(
                            RichText::new("e.g. \"What is Clover used for?\"")
                                .size(11.0)
                                .color(MUTED),
                        );
                    });
                }

                for (i, message) in messages.iter().enumerate() {
                    ui.add_space(6.0);
                    self.bubble(ui, message, i);
                }

                if loading {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        egui::Frame::new()
                            .fill(ASSISTANT_BUBBLE)
                            .corner_radius(8.0)
                            .inner_margin(10.0)
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.spinner();
                                    ui.label(RichText::new("Thinking…").color(MUTED));
                                });
                            });
                    });
                }
            });

        if messages.is_empty() {
            ui.add_space(4.0);
            ui.label(RichText::new("💡 Suggested questions").size(11.0).color(MUTED));
            ui.horizontal_wrapped(|ui| {
                for question in SUGGESTED_QUESTIONS {
                    if ui.small_button(question).clicked() {
                        outgoing = Some(question.to_string());
                    }
                }
            });
        }

        ui.separator();
        ui.horizontal(|ui| {
            let edit = TextEdit::singleline(&mut self.input)
                .hint_text("Ask about a term… (e.g. What is Clover?)")
                .desired_width(ui.available_width() - 40.0);
            let response = ui.add_enabled(!loading, edit);

            let can_send = !loading && !self.input.trim().is_empty();
            let send_clicked = ui
                .add_enabled(can_send, egui::Button::new("➤"))
                .on_hover_text("Send")
                .clicked();
            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            if can_send && (send_clicked || enter_pressed) {
                outgoing = Some(self.input.trim().to_string());
                self.input.clear();
                response.request_focus();
            }
        });

        outgoing
    }

    fn bubble(&self, ui: &mut Ui, message: &ChatMessage, index: usize) {
        let max_width = ui.available_width() * 0.85;
        let (fill, align) = match message.role {
            Role::User => (USER_BUBBLE, egui::Align::Max),
            Role::Assistant => (ASSISTANT_BUBBLE, egui::Align::Min),
        };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            egui::Frame::new()
                .fill(fill)
                .corner_radius(8.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(&message.content).size(12.5));
                });

            if let Some(process) = &message.search_process {
                search_process_section(ui, process, index, max_width);
            }
        });
    }
}

fn search_process_section(ui: &mut Ui, process: &SearchProcess, index: usize, max_width: f32) {
    ui.set_max_width(max_width);
    CollapsingHeader::new(
        RichText::new(format!("🔍 Search process ({} steps)", process.steps.len())).size(11.0),
    )
    .id_salt(("search_process", index))
    .default_open(false)
    .show(ui, |ui| {
        for step in &process.steps {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Step {}", step.step))
                        .monospace()
                        .size(10.0)
                        .color(MUTED),
                );
                ui.label(RichText::new(&step.name).size(11.0));
            });
            if !step.description.is_empty() {
                ui.label(RichText::new(&step.description).size(10.0).color(MUTED));
            }
        }

        if !process.reasoning_chain.is_empty() {
            ui.separator();
            ui.label(RichText::new("🧠 Reasoning chain").size(10.0).color(MUTED));
            for (i, hop) in process.reasoning_chain.iter().enumerate() {
                ui.label(
                    RichText::new(format!("{}. {}", i + 1, hop))
                        .monospace()
                        .size(10.0),
                );
            }
        }

        if !process.found_terms.is_empty() {
            ui.separator();
            ui.label(
                RichText::new(format!("Found terms ({})", process.found_terms.len()))
                    .size(10.0)
                    .color(MUTED),
            );
            ui.horizontal_wrapped(|ui| {
                for found in &process.found_terms {
                    let color = category_color(Category::parse(&found.category));
                    ui.label(
                        RichText::new(format!("{} ({})", found.term, found.category))
                            .size(10.0)
                            .color(color),
                    );
                }
            });
            if let Some(center) = &process.center_term {
                ui.label(
                    RichText::new(format!("Center term: {}", center))
                        .size(10.0)
                        .color(MUTED),
                );
            }
        }

        if !process.traversal_log.is_empty() {
            ui.separator();
            ui.label(RichText::new("🔄 Hop traversal").size(10.0).color(MUTED));
            ScrollArea::vertical()
                .id_salt(("traversal_log", index))
                .max_height(110.0)
                .show(ui, |ui| {
                    for (i, entry) in process.traversal_log.iter().enumerate() {
                        ui.label(
                            RichText::new(format!("Hop {}: {}", i + 1, entry))
                                .monospace()
                                .size(10.0),
                        );
                    }
                });
        }

        if process.nodes_count > 0 {
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "📊 Subgraph: {} nodes, {} edges",
                    process.nodes_count, process.edges_count
                ))
                .size(10.0),
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_history_maps_roles() {
        let messages = vec![
            ChatMessage::user("What is Clover used for?"),
            ChatMessage::assistant("Clover powers stage entries.", None),
        ];
        let wire = wire_history(&messages);
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].role, "user");
        assert_eq!(wire[1].role, "assistant");
        assert_eq!(wire[1].content, "Clover powers stage entries.");
    }
}
