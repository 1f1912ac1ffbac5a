// File: crates/bars-core/src/horizontal_bar.rs
// Summary: Horizontal bar chart: value axes top and bottom, categorical y axis, sort toggle.
// Notes:
// - With few categories the plot height shrinks to `len * maxBarHeight + 20` for
//   that redraw only; the configured size is kept for the next one.

use crate::bars::{BarCore, Orientation};
use crate::config::{ChartConfig, HORIZONTAL_BAR_DEFAULTS};
use crate::data::Datum;
use crate::error::Result;
use crate::page::{Container, Page};
use crate::palette::{self, Color};
use crate::types::{Insets, PlotSize};

pub struct HorizontalBarChart {
    core: BarCore,
}

impl HorizontalBarChart {
    pub fn new(page: &Page, selector: &str, config: ChartConfig) -> Result<Self> {
        Ok(Self {
            core: BarCore::new(page, selector, config, HORIZONTAL_BAR_DEFAULTS, Orientation::Horizontal)?,
        })
    }

    pub fn reset_dimensions(&self, width: f64, height: f64) -> Result<()> {
        self.core.reset_dimensions(width, height)
    }

    /// Accepts [`HorizontalBarDatum`](crate::HorizontalBarDatum) (`{x: value, y: category}`)
    /// or plain [`Datum`] records.
    pub fn redraw_chart<I>(&self, data: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Datum>,
    {
        self.core.redraw(data.into_iter().map(Into::into).collect())
    }

    pub fn sort(&self, by_value: bool) {
        self.core.sort(by_value);
    }

    pub fn generate_color(&self, index: usize) -> Color {
        palette::generate_color(index)
    }

    /// Configured plot size.
    pub fn plot_size(&self) -> PlotSize { self.core.plot_size() }

    /// Plot size of the current rendering, after the bar-height cap.
    pub fn rendered_plot_size(&self) -> Option<PlotSize> { self.core.rendered_plot() }

    pub fn margin(&self) -> Insets { self.core.margin() }
    pub fn container(&self) -> Container { self.core.container() }
    pub fn domain(&self) -> Vec<String> { self.core.domain() }
    pub fn value_domain(&self) -> Option<(f64, f64)> { self.core.value_domain() }
}
