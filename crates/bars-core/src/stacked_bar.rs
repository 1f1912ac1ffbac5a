// File: crates/bars-core/src/stacked_bar.rs
// Summary: Stacked/grouped multi-series bar chart with legend, hover tooltip and layout toggle.
// Notes:
// - Layers grow from the baseline when drawn; the toggle then moves rects between the
//   stacked and grouped layouts in two chained stages.
// - Series must share the first series' categories in the same order (validated).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::axis::{Axis, Orient, TickLabelStyle};
use crate::config::{ChartConfig, STACKED_BAR_DEFAULTS};
use crate::data::Series;
use crate::error::{ChartError, Result};
use crate::format;
use crate::page::{Container, Page};
use crate::palette::{self, Color, SeriesColors};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Group, Node, Rect, SceneId, Svg, Text, Tooltip};
use crate::stack::{self, StackLayout};
use crate::types::{Insets, PlotSize, DEFAULT_TRANSITION_MS, TOGGLE_DURATION_MS, TOGGLE_STAGGER_MS};

const BAND_PADDING: f64 = 0.25;
const TITLE_FONT_SIZE: f64 = 16.0;

struct StackedRendered {
    scene: SceneId,
    layout: StackLayout,
    band: BandScale,
    y: LinearScale,
    plot: PlotSize,
    grouped: bool,
}

struct StackedState {
    page: Page,
    container: Container,
    config: ChartConfig,
    margin: Insets,
    size: PlotSize,
    rendered: Option<StackedRendered>,
}

/// Multi-series bars that toggle between stacked and grouped layouts.
pub struct StackedBarChart {
    state: Rc<RefCell<StackedState>>,
}

impl StackedBarChart {
    pub fn new(page: &Page, selector: &str, config: ChartConfig) -> Result<Self> {
        let container = page
            .container(selector)
            .ok_or_else(|| ChartError::MountNotFound(selector.to_string()))?;
        let margin = config.margin(&STACKED_BAR_DEFAULTS);
        let size = config.plot_size(&STACKED_BAR_DEFAULTS, page.viewport_width());
        if !size.is_drawable() {
            return Err(ChartError::InvalidDimensions { width: size.width, height: size.height });
        }
        Ok(Self {
            state: Rc::new(RefCell::new(StackedState {
                page: page.clone(),
                container,
                config,
                margin,
                size,
                rendered: None,
            })),
        })
    }

    pub fn reset_dimensions(&self, width: f64, height: f64) -> Result<()> {
        let mut st = self.state.borrow_mut();
        let size = PlotSize::from_outer(width, height, &st.margin);
        if !size.is_drawable() {
            return Err(ChartError::InvalidDimensions { width: size.width, height: size.height });
        }
        st.size = size;
        Ok(())
    }

    /// Replace the rendered chart with one built from `series`. Invalid series
    /// leave the previous rendering untouched.
    pub fn redraw_chart<I>(&self, series: I) -> Result<()>
    where
        I: IntoIterator<Item = Series>,
    {
        let series: Vec<Series> = series.into_iter().collect();
        let layout = stack::stack(&series)?;
        {
            let mut st = self.state.borrow_mut();
            st.container.clear();
            let rendered = st.build(layout);
            log::debug!(
                "redrew stacked chart under {} ({} layers x {} categories)",
                st.container.selector(),
                rendered.layout.layers.len(),
                rendered.layout.categories.len()
            );
            st.rendered = Some(rendered);
        }
        self.wire_toggle_controls();
        Ok(())
    }

    /// Switch layouts directly, as the toggle controls do.
    pub fn set_grouped(&self, grouped: bool) {
        self.state.borrow_mut().transition(grouped);
    }

    pub fn is_grouped(&self) -> bool {
        self.state.borrow().rendered.as_ref().is_some_and(|r| r.grouped)
    }

    /// Show the tooltip for the top-most bar under `(x, y)` (svg coordinates)
    /// at the current clock time. Misses hide the tooltip.
    pub fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
        self.state.borrow().hover(x, y)
    }

    pub fn unhover(&self) {
        let st = self.state.borrow();
        if let Some(r) = &st.rendered {
            st.container.with_scene_mut(r.scene, |svg| svg.tooltip = None);
        }
    }

    pub fn generate_color(&self, index: usize) -> Color {
        palette::generate_color(index)
    }

    pub fn plot_size(&self) -> PlotSize { self.state.borrow().size }
    pub fn margin(&self) -> Insets { self.state.borrow().margin }
    pub fn container(&self) -> Container { self.state.borrow().container.clone() }

    pub fn domain(&self) -> Vec<String> {
        self.state.borrow().rendered.as_ref().map(|r| r.band.domain().to_vec()).unwrap_or_default()
    }

    /// Current y domain: `[0, stack max]` when stacked, `[0, group max]` when grouped.
    pub fn value_domain(&self) -> Option<(f64, f64)> {
        self.state.borrow().rendered.as_ref().map(|r| r.y.domain())
    }

    pub fn layout(&self) -> Option<StackLayout> {
        self.state.borrow().rendered.as_ref().map(|r| r.layout.clone())
    }

    fn wire_toggle_controls(&self) {
        let (page, selectors) = {
            let st = self.state.borrow();
            let selectors: Vec<String> =
                [&st.config.stacked_btn, &st.config.grouped_btn].into_iter().flatten().cloned().collect();
            (st.page.clone(), selectors)
        };
        for selector in selectors {
            let Some(control) = page.toggle(&selector) else {
                log::warn!("layout control `{selector}` not found");
                continue;
            };
            let weak: Weak<RefCell<StackedState>> = Rc::downgrade(&self.state);
            control.on_change(move |event| {
                if let Some(state) = weak.upgrade() {
                    state.borrow_mut().transition(event.value == "grouped");
                }
            });
        }
    }
}

impl StackedState {
    fn build(&self, layout: StackLayout) -> StackedRendered {
        let plot = self.size;
        let now = self.page.now() as f64;
        let band = BandScale::new(layout.categories.iter().cloned(), (0.0, plot.width), BAND_PADDING, BAND_PADDING);
        let y = LinearScale::new((0.0, layout.stack_max), (plot.height, 0.0));
        let colors = SeriesColors::for_series_count(layout.layers.len());

        let mut root = Group::new("plot").at(self.margin.left, self.margin.top);
        for (i, layer) in layout.layers.iter().enumerate() {
            let mut g = Group::new("layer");
            g.key = Some(layer.name.clone());
            g.fill = Some(colors.color(i));
            for (j, p) in layer.points.iter().enumerate() {
                let x = band.map(&p.category).unwrap_or(0.0);
                let mut rect = Rect::new("bar", p.category.clone(), p.y).with_geometry(x, plot.height, band.bandwidth(), 0.0);
                let start = now + j as f64 * TOGGLE_STAGGER_MS;
                rect.y.animate(y.map(p.top()), start, DEFAULT_TRANSITION_MS);
                rect.height.animate(y.map(p.y0) - y.map(p.top()), start, DEFAULT_TRANSITION_MS);
                g.push(rect);
            }
            root.push(g);
        }

        let x_axis = Axis::new(Orient::Bottom)
            .with_tick_size(0.0)
            .with_tick_padding(6.0)
            .with_label_style(TickLabelStyle::rotated(-0.8, 0.15));
        root.push(x_axis.render("x axis", &Axis::band_ticks(&band), band.range()).at(0.0, plot.height));
        root.push(self.y_axis(&y));

        let mut legend = Group::new("legend").at(-20.0, 50.0);
        for (row, i) in (0..layout.layers.len()).rev().enumerate() {
            let top = row as f64 * 20.0;
            let name = &layout.layers[i].name;
            legend.push(
                Rect::new("swatch", name.clone(), 0.0)
                    .with_geometry(plot.width + 15.0, top, 10.0, 10.0)
                    .with_fill(colors.color(i)),
            );
            legend.push(Text::new("legendLabel", name.clone()).keyed(name.clone()).at(plot.width + 32.0, top + 9.0));
        }
        root.push(legend);

        if let Some(title) = &self.config.title {
            let mut text = Text::new("chartTitle", title.clone())
                .at(plot.width / 2.0, -self.margin.top / 2.0)
                .anchored(Anchor::Middle)
                .sized(TITLE_FONT_SIZE);
            text.underline = true;
            root.push(text);
        }

        let (w, h) = plot.outer(&self.margin);
        let scene = self.container.append(Svg::new(w, h, root));
        StackedRendered { scene, layout, band, y, plot, grouped: false }
    }

    fn y_axis(&self, y: &LinearScale) -> Group {
        let axis = Axis::new(Orient::Left);
        let mut g = axis.render("y axis", &axis.value_ticks(y), y.range());
        if let Some(label) = &self.config.y_axis_label {
            g.push(
                Text::new("axisLabel", label.clone())
                    .at(6.0, 0.0)
                    .rotated(-90.0)
                    .offset_em(0.0, 0.71)
                    .anchored(Anchor::End),
            );
        }
        g
    }

    /// Move every rect to the grouped (`true`) or stacked layout and rebuild the y axis.
    fn transition(&mut self, grouped: bool) {
        let now = self.page.now() as f64;
        let Some(mut r) = self.rendered.take() else { return };
        let max = if grouped { r.layout.group_max } else { r.layout.stack_max };
        r.y.set_domain((0.0, max));
        r.grouped = grouped;
        let y_axis = self.y_axis(&r.y);

        let (layout, band, y, height) = (&r.layout, &r.band, &r.y, r.plot.height);
        let n = layout.layers.len().max(1) as f64;
        self.container.with_scene_mut(r.scene, |svg| {
            let layers = svg.root.children.iter_mut().filter_map(|node| match node {
                Node::Group(g) if g.class == "layer" => Some(g),
                _ => None,
            });
            for (i, (g, layer)) in layers.zip(&layout.layers).enumerate() {
                let rects = g.children.iter_mut().filter_map(|node| match node {
                    Node::Rect(rect) => Some(rect),
                    _ => None,
                });
                for (j, (rect, p)) in rects.zip(&layer.points).enumerate() {
                    let t1 = now + j as f64 * TOGGLE_STAGGER_MS;
                    let t2 = t1 + TOGGLE_DURATION_MS;
                    let x = band.map(&p.category).unwrap_or(0.0);
                    rect.interrupt(t1);
                    if grouped {
                        let w = band.bandwidth() / n;
                        rect.x.animate(x + w * i as f64, t1, TOGGLE_DURATION_MS);
                        rect.width.animate(w, t1, TOGGLE_DURATION_MS);
                        rect.y.animate(y.map(p.y), t2, TOGGLE_DURATION_MS);
                        rect.height.animate(height - y.map(p.y), t2, TOGGLE_DURATION_MS);
                    } else {
                        rect.y.animate(y.map(p.top()), t1, TOGGLE_DURATION_MS);
                        rect.height.animate(y.map(p.y0) - y.map(p.top()), t1, TOGGLE_DURATION_MS);
                        rect.x.animate(x, t2, TOGGLE_DURATION_MS);
                        rect.width.animate(band.bandwidth(), t2, TOGGLE_DURATION_MS);
                    }
                }
            }
            if let Some(slot) = svg.root.children.iter_mut().find(|n| n.tag() == "g" && n.class() == "y axis") {
                *slot = Node::Group(y_axis);
            }
        });
        log::debug!("stacked chart switched to {} layout (y max {max})", if grouped { "grouped" } else { "stacked" });
        self.rendered = Some(r);
    }

    fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
        let r = self.rendered.as_ref()?;
        let t = self.page.now() as f64;
        let (lx, ly) = (x - self.margin.left, y - self.margin.top);
        let (left, top) = (self.margin.left, self.margin.top);
        self.container
            .with_scene_mut(r.scene, |svg| {
                let tip = svg.rects("rect.bar").into_iter().rev().find_map(|rect| {
                    let b = rect.bounds_at(t);
                    b.contains(lx, ly).then(|| Tooltip {
                        text: format::number(rect.value),
                        x: b.center_x() + left,
                        y: b.top + top,
                    })
                });
                svg.tooltip = tip.clone();
                tip
            })
            .flatten()
    }
}
