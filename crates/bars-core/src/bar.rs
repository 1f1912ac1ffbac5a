// File: crates/bars-core/src/bar.rs
// Summary: Vertical bar chart: categorical x axis, linear y axis, value labels, sort toggle.

use crate::bars::{BarCore, Orientation};
use crate::config::{ChartConfig, BAR_DEFAULTS};
use crate::data::Datum;
use crate::error::Result;
use crate::page::{Container, Page};
use crate::palette::{self, Color};
use crate::types::{Insets, PlotSize};

/// Vertical bars mounted under one container of a [`Page`].
///
/// ```
/// use bars_core::{BarChart, BarDatum, ChartConfig, Page};
///
/// let page = Page::new(1280.0);
/// page.add_container("#barChart");
/// let chart = BarChart::new(&page, "#barChart", ChartConfig::default().with_title("Fruit"))?;
/// chart.redraw_chart(vec![BarDatum::new("Apples", 5.0), BarDatum::new("Pears", 3.0)])?;
/// assert_eq!(chart.domain(), vec!["Apples", "Pears"]);
/// # Ok::<(), bars_core::ChartError>(())
/// ```
pub struct BarChart {
    core: BarCore,
}

impl BarChart {
    pub fn new(page: &Page, selector: &str, config: ChartConfig) -> Result<Self> {
        Ok(Self { core: BarCore::new(page, selector, config, BAR_DEFAULTS, Orientation::Vertical)? })
    }

    /// Recompute the plot area from a new outer size. The next redraw uses it.
    pub fn reset_dimensions(&self, width: f64, height: f64) -> Result<()> {
        self.core.reset_dimensions(width, height)
    }

    /// Replace whatever is rendered under the mount point with a chart of `data`.
    pub fn redraw_chart<I>(&self, data: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Datum>,
    {
        self.core.redraw(data.into_iter().map(Into::into).collect())
    }

    /// Apply the sort interaction directly: by value (descending) or by category.
    pub fn sort(&self, by_value: bool) {
        self.core.sort(by_value);
    }

    pub fn generate_color(&self, index: usize) -> Color {
        palette::generate_color(index)
    }

    pub fn plot_size(&self) -> PlotSize { self.core.plot_size() }
    pub fn margin(&self) -> Insets { self.core.margin() }
    pub fn container(&self) -> Container { self.core.container() }

    /// Category order of the band scale (input order until sorted).
    pub fn domain(&self) -> Vec<String> { self.core.domain() }

    pub fn value_domain(&self) -> Option<(f64, f64)> { self.core.value_domain() }
}
