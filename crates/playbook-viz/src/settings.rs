//! Settings structures for the viewer UI.

/// Navigation & viewport parameters.
#[derive(Debug, Clone)]
pub struct SettingsNavigation {
    /// Scroll-to-zoom sensitivity.
    pub zoom_speed: f32,
    /// Auto-fit the view whenever a new subgraph replaces the scene.
    pub fit_on_replace: bool,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_speed: 0.002,
            fit_on_replace: true,
        }
    }
}

/// Visual style toggles.
#[derive(Debug, Clone)]
pub struct SettingsStyle {
    /// Show relation labels with the confidence percentage.
    pub show_edge_labels: bool,
    /// Animate high-confidence edges with marching dashes.
    pub animate_high_confidence: bool,
    /// Draw the background dot grid.
    pub show_grid: bool,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            show_edge_labels: true,
            animate_high_confidence: true,
            show_grid: true,
        }
    }
}
