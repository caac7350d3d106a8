//! egui viewer for Playbook.
//!
//! Chat transcript on the left, the active answer's knowledge subgraph
//! in the center, drawn with the deterministic radial layout from
//! `playbook-core`.

mod app;
mod chat;
mod client;
mod graph_view;
mod overlays;
mod sample;
mod scene;
mod settings;
mod style;

pub use app::PlaybookApp;
