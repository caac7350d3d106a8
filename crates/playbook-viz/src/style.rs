//! Category color table and node/edge visual resolvers.
//!
//! Everything here is a pure function from a context struct to a visuals
//! struct; the canvas never computes a color on its own.

use egui::{Color32, Stroke};
use playbook_core::{Category, ConfidenceTier};

/// Fill used for any category outside the recognized set.
pub const FALLBACK_CATEGORY_COLOR: Color32 = Color32::from_rgb(71, 85, 105);

/// Fill of the center node. Overrides the category color so the focal
/// term is always recognizable.
pub const CENTER_FILL: Color32 = Color32::from_rgb(245, 158, 11);

/// Border of the center node.
pub const CENTER_BORDER: Color32 = Color32::from_rgb(251, 191, 36);

/// Border drawn around the selected node.
pub const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 212, 255);

/// Total lookup from category to fill color. Unknown categories get
/// [`FALLBACK_CATEGORY_COLOR`], never an error.
pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Content => Color32::from_rgb(34, 197, 94),
        Category::GameObject => Color32::from_rgb(59, 130, 246),
        Category::CurrencySoft => Color32::from_rgb(234, 179, 8),
        Category::CurrencyHard => Color32::from_rgb(239, 68, 68),
        Category::Resource => Color32::from_rgb(168, 85, 247),
        Category::Mechanic => Color32::from_rgb(249, 115, 22),
        Category::Difficulty => Color32::from_rgb(236, 72, 153),
        Category::Metric => Color32::from_rgb(6, 182, 212),
        Category::UxFactor => Color32::from_rgb(139, 92, 246),
        Category::Condition => Color32::from_rgb(100, 116, 139),
        Category::System => Color32::from_rgb(99, 102, 241),
        Category::Unknown => FALLBACK_CATEGORY_COLOR,
    }
}

/// Stroke/arrow color for a confidence tier.
pub fn tier_color(tier: ConfidenceTier) -> Color32 {
    match tier {
        ConfidenceTier::High => Color32::from_rgb(34, 197, 94),
        ConfidenceTier::Standard => Color32::from_rgb(234, 179, 8),
    }
}

// =============================================================================
// Node Visuals
// =============================================================================

/// Inputs the node resolver depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeVisualContext {
    pub category: Category,
    pub is_center: bool,
    pub selected: bool,
}

/// Resolved presentation attributes for one node card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisuals {
    pub fill: Color32,
    pub stroke: Stroke,
    /// Minimum card width in layout units.
    pub min_width: f32,
    /// Center nodes get a soft glow behind the card.
    pub glow: bool,
}

pub fn resolve_node_visuals(ctx: NodeVisualContext) -> NodeVisuals {
    let fill = if ctx.is_center {
        CENTER_FILL
    } else {
        category_color(ctx.category)
    };

    let stroke = if ctx.selected {
        Stroke::new(3.0, SELECTION_COLOR)
    } else if ctx.is_center {
        Stroke::new(4.0, CENTER_BORDER)
    } else {
        Stroke::new(2.0, Color32::from_rgba_unmultiplied(255, 255, 255, 51))
    };

    NodeVisuals {
        fill,
        stroke,
        min_width: if ctx.is_center { 160.0 } else { 130.0 },
        glow: ctx.is_center,
    }
}

// =============================================================================
// Edge Visuals
// =============================================================================

/// Inputs the edge resolver depends on: the confidence tier and whether
/// either endpoint is the center node. Nothing else affects styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeVisualContext {
    pub tier: ConfidenceTier,
    pub center_adjacent: bool,
}

/// Resolved presentation attributes for one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVisuals {
    pub stroke: Stroke,
    /// Arrowhead length in layout units.
    pub arrow_size: f32,
    /// Marching-dash animation, high-confidence edges only.
    pub animated: bool,
}

pub fn resolve_edge_visuals(ctx: EdgeVisualContext) -> EdgeVisuals {
    let color = tier_color(ctx.tier);
    let width = if ctx.center_adjacent { 3.0 } else { 2.5 };
    let arrow_size = if ctx.center_adjacent { 12.0 } else { 10.0 };

    EdgeVisuals {
        stroke: Stroke::new(width, color),
        arrow_size,
        animated: ctx.tier == ConfidenceTier::High,
    }
}

/// Visuals for a user-drawn annotation edge. Neutral, never animated,
/// and deliberately lighter than real relations.
pub fn annotation_edge_visuals() -> EdgeVisuals {
    EdgeVisuals {
        stroke: Stroke::new(2.0, Color32::from_rgb(100, 116, 139)),
        arrow_size: 10.0,
        animated: false,
    }
}

// =============================================================================
// Edge Flow Animation
// =============================================================================

/// Phase state driving the marching dashes on high-confidence edges.
#[derive(Debug, Clone)]
pub struct EdgeFlowState {
    /// Animation phase (0.0 to 1.0, loops).
    pub phase: f32,
    /// Animation speed multiplier.
    pub speed: f32,
    /// Whether animation is enabled.
    pub enabled: bool,
}

impl Default for EdgeFlowState {
    fn default() -> Self {
        Self {
            phase: 0.0,
            speed: 1.0,
            enabled: true,
        }
    }
}

impl EdgeFlowState {
    /// Advance the animation by delta time.
    pub fn tick(&mut self, dt: f32) {
        if self.enabled {
            self.phase = (self.phase + dt * self.speed) % 1.0;
        }
    }

    /// Current dash offset for the given dash period (dash + gap length).
    pub fn dash_offset(&self, period: f32) -> f32 {
        self.phase * period
    }
}
