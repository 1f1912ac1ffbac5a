// File: crates/bars-core/src/lib.rs
// Summary: Core library entry point; exports the page model, chart components and scene types.

pub mod types;
pub mod geometry;
pub mod grid;
pub mod format;
pub mod palette;
pub mod tween;
pub mod scale;
pub mod scene;
pub mod axis;
pub mod controls;
pub mod page;
pub mod error;
pub mod config;
pub mod data;
pub mod stack;
mod bars;
pub mod bar;
pub mod horizontal_bar;
pub mod stacked_bar;

pub use bar::BarChart;
pub use horizontal_bar::HorizontalBarChart;
pub use stacked_bar::StackedBarChart;
pub use page::{Container, Page, TimerId};
pub use controls::{ToggleControl, ToggleEvent};
pub use config::{ChartConfig, ChartDefaults};
pub use error::{ChartError, Result};
pub use data::{BarDatum, Datum, HorizontalBarDatum, Series};
pub use scene::{Anchor, Group, Line, Node, Rect, SceneId, Svg, Text, Tooltip};
pub use palette::{generate_color, Color};
pub use stack::StackLayout;
pub use types::{Insets, PlotSize};
