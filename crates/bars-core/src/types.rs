// File: crates/bars-core/src/types.rs
// Summary: Shared types and constants (margins, plot sizes, transition timings).

/// Fallback one-shot delay before an opt-in auto sort fires.
pub const DEFAULT_AUTO_SORT_DELAY_MS: u64 = 2000;
/// Duration of the sort transition on bar and horizontal bar charts.
pub const SORT_DURATION_MS: f64 = 750.0;
/// Per-item stagger applied to sort transitions.
pub const SORT_STAGGER_MS: f64 = 50.0;
/// Duration of each stage of the stacked/grouped transition.
pub const TOGGLE_DURATION_MS: f64 = 500.0;
/// Per-item stagger applied to stacked chart transitions.
pub const TOGGLE_STAGGER_MS: f64 = 10.0;
/// Duration used when a transition does not set one explicitly.
pub const DEFAULT_TRANSITION_MS: f64 = 250.0;

/// Chart margins in pixels, CSS order (top, right, bottom, left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }
}

/// Inner plotting area, i.e. the outer size minus margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotSize {
    pub width: f64,
    pub height: f64,
}

impl PlotSize {
    pub fn from_outer(outer_width: f64, outer_height: f64, margin: &Insets) -> Self {
        Self {
            width: outer_width - margin.hsum(),
            height: outer_height - margin.vsum(),
        }
    }

    /// Outer (svg) size for this plot area.
    pub fn outer(&self, margin: &Insets) -> (f64, f64) {
        (self.width + margin.hsum(), self.height + margin.vsum())
    }

    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
