// File: crates/bars-core/src/config.rs
// Summary: Chart configuration (all options optional) and per-component defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::types::{Insets, PlotSize};

/// Options shared by every chart component. Absent options fall back to the
/// component's [`ChartDefaults`]; explicit values (including zero) are kept.
///
/// Keys are camelCase on the wire, e.g. `{"title": "Fruit", "sortCheckbox": "#sort"}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    /// Outer width including margins.
    pub width: Option<f64>,
    /// Outer height including margins.
    pub height: Option<f64>,
    pub title: Option<String>,
    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
    /// Clamp the width to the viewport (minus a per-component reserve).
    pub shrink_width_to_fit: bool,
    /// Color bars individually instead of with the first palette entry.
    pub multiple_colors: bool,
    /// Offset of value labels from the bar end, in pixels.
    pub bar_label_padding: Option<f64>,
    /// Horizontal offset of rotated category labels, in em. Accepts `-4` or `"-4em"`.
    #[serde(deserialize_with = "em_offset")]
    pub text_dx: Option<f64>,
    /// Force (`true`) or suppress (`false`) rotated category labels.
    pub rotate_labels: Option<bool>,
    /// Horizontal chart: tallest bar before the plot height shrinks to fit.
    pub max_bar_height: Option<f64>,
    pub sort_checkbox: Option<String>,
    pub stacked_btn: Option<String>,
    pub grouped_btn: Option<String>,
    /// Opt-in one-shot auto sort (by value) after this many milliseconds.
    pub auto_sort_delay_ms: Option<u64>,
}

fn em_offset<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => s
            .trim()
            .trim_end_matches("em")
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an em offset, got {s:?}"))),
    }
}

impl ChartConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_margins(mut self, margin: Insets) -> Self {
        self.top = Some(margin.top);
        self.right = Some(margin.right);
        self.bottom = Some(margin.bottom);
        self.left = Some(margin.left);
        self
    }

    pub fn with_axis_labels(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        self.x_axis_label = x.map(str::to_string);
        self.y_axis_label = y.map(str::to_string);
        self
    }

    pub fn with_multiple_colors(mut self, on: bool) -> Self {
        self.multiple_colors = on;
        self
    }

    pub fn with_shrink_to_fit(mut self, on: bool) -> Self {
        self.shrink_width_to_fit = on;
        self
    }

    pub fn with_sort_checkbox(mut self, selector: impl Into<String>) -> Self {
        self.sort_checkbox = Some(selector.into());
        self
    }

    pub fn with_toggle_buttons(mut self, stacked: impl Into<String>, grouped: impl Into<String>) -> Self {
        self.stacked_btn = Some(stacked.into());
        self.grouped_btn = Some(grouped.into());
        self
    }

    pub fn with_auto_sort(mut self, delay_ms: u64) -> Self {
        self.auto_sort_delay_ms = Some(delay_ms);
        self
    }

    pub fn with_label_padding(mut self, padding: f64) -> Self {
        self.bar_label_padding = Some(padding);
        self
    }

    pub fn margin(&self, d: &ChartDefaults) -> Insets {
        Insets::new(
            self.top.unwrap_or(d.margin.top),
            self.right.unwrap_or(d.margin.right),
            self.bottom.unwrap_or(d.margin.bottom),
            self.left.unwrap_or(d.margin.left),
        )
    }

    pub fn label_padding(&self, d: &ChartDefaults) -> f64 {
        self.bar_label_padding.unwrap_or(d.label_padding)
    }

    /// Plot size from the configured (or default) outer size. With shrink-to-fit
    /// the width is clamped so the chart plus the reserve fits the viewport.
    pub fn plot_size(&self, d: &ChartDefaults, viewport_width: f64) -> PlotSize {
        let margin = self.margin(d);
        let mut size = PlotSize::from_outer(
            self.width.unwrap_or(d.width),
            self.height.unwrap_or(d.height),
            &margin,
        );
        if self.shrink_width_to_fit && viewport_width < size.width + d.viewport_reserve + margin.hsum() {
            let clamped = viewport_width - d.viewport_reserve - margin.hsum();
            log::warn!("shrinking plot width from {} to {} to fit viewport {}", size.width, clamped, viewport_width);
            size.width = clamped;
        }
        size
    }
}

/// Per-component fallbacks for [`ChartConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartDefaults {
    pub margin: Insets,
    pub width: f64,
    pub height: f64,
    /// Pixels kept free beside the chart when shrinking to the viewport.
    pub viewport_reserve: f64,
    pub label_padding: f64,
}

pub const BAR_DEFAULTS: ChartDefaults = ChartDefaults {
    margin: Insets::new(55.0, 20.0, 150.0, 50.0),
    width: 720.0,
    height: 530.0,
    viewport_reserve: 50.0,
    label_padding: -10.0,
};

pub const HORIZONTAL_BAR_DEFAULTS: ChartDefaults = ChartDefaults {
    margin: Insets::new(60.0, 45.0, 60.0, 100.0),
    width: 820.0,
    height: 860.0,
    viewport_reserve: 100.0,
    label_padding: 15.0,
};

/// The wide right margin holds the legend.
pub const STACKED_BAR_DEFAULTS: ChartDefaults = ChartDefaults {
    margin: Insets::new(30.0, 150.0, 100.0, 50.0),
    width: 1060.0,
    height: 500.0,
    viewport_reserve: 50.0,
    label_padding: 0.0,
};

/// Default horizontal-chart bar height cap.
pub const DEFAULT_MAX_BAR_HEIGHT: f64 = 55.0;
/// Default em offset of rotated category labels on the vertical bar chart.
pub const DEFAULT_TEXT_DX_EM: f64 = -4.0;
