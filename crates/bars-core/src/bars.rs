// File: crates/bars-core/src/bars.rs
// Summary: Shared core of the single-series bar charts (vertical and horizontal).
// Notes:
// - State lives behind `Rc<RefCell<..>>` so control listeners and timers can reach it
//   through a `Weak` handle; dropping the chart silently disables them.
// - Never hold a borrow of the state while dispatching a control: the listener
//   borrows it again.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::axis::{estimate_label_width, Axis, Orient, TickLabelStyle};
use crate::config::{ChartConfig, ChartDefaults, DEFAULT_MAX_BAR_HEIGHT, DEFAULT_TEXT_DX_EM};
use crate::controls::ToggleControl;
use crate::data::Datum;
use crate::error::{ChartError, Result};
use crate::format;
use crate::page::{Container, Page, TimerId};
use crate::palette::{bar_fill, Color, OrdinalColors, BAR_PALETTE};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Group, Node, Rect, SceneId, Svg, Text};
use crate::types::{Insets, PlotSize, SORT_DURATION_MS, SORT_STAGGER_MS};

const AXIS_FONT_SIZE: f64 = 10.0;
const VALUE_LABEL_FONT_SIZE: f64 = 11.0;
const TITLE_FONT_SIZE: f64 = 16.0;
const BAND_PADDING: f64 = 0.1;
const BAND_OUTER_PADDING: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Orientation {
    Vertical,
    Horizontal,
}

/// What one redraw produced; sorting rewrites it in place.
struct Rendered {
    scene: SceneId,
    data: Vec<Datum>,
    band: BandScale,
    value: LinearScale,
    plot: PlotSize,
}

struct BarState {
    page: Page,
    container: Container,
    config: ChartConfig,
    defaults: ChartDefaults,
    orientation: Orientation,
    margin: Insets,
    size: PlotSize,
    rendered: Option<Rendered>,
    auto_sort: Option<TimerId>,
}

pub(crate) struct BarCore {
    state: Rc<RefCell<BarState>>,
}

impl BarCore {
    pub(crate) fn new(
        page: &Page,
        selector: &str,
        config: ChartConfig,
        defaults: ChartDefaults,
        orientation: Orientation,
    ) -> Result<Self> {
        let container = page
            .container(selector)
            .ok_or_else(|| ChartError::MountNotFound(selector.to_string()))?;
        let margin = config.margin(&defaults);
        let size = config.plot_size(&defaults, page.viewport_width());
        if !size.is_drawable() {
            return Err(ChartError::InvalidDimensions { width: size.width, height: size.height });
        }
        Ok(Self {
            state: Rc::new(RefCell::new(BarState {
                page: page.clone(),
                container,
                config,
                defaults,
                orientation,
                margin,
                size,
                rendered: None,
                auto_sort: None,
            })),
        })
    }

    pub(crate) fn reset_dimensions(&self, width: f64, height: f64) -> Result<()> {
        let mut st = self.state.borrow_mut();
        let size = PlotSize::from_outer(width, height, &st.margin);
        if !size.is_drawable() {
            return Err(ChartError::InvalidDimensions { width: size.width, height: size.height });
        }
        st.size = size;
        Ok(())
    }

    pub(crate) fn plot_size(&self) -> PlotSize { self.state.borrow().size }
    pub(crate) fn margin(&self) -> Insets { self.state.borrow().margin }
    pub(crate) fn container(&self) -> Container { self.state.borrow().container.clone() }

    pub(crate) fn domain(&self) -> Vec<String> {
        self.state.borrow().rendered.as_ref().map(|r| r.band.domain().to_vec()).unwrap_or_default()
    }

    pub(crate) fn value_domain(&self) -> Option<(f64, f64)> {
        self.state.borrow().rendered.as_ref().map(|r| r.value.domain())
    }

    /// Plot size used by the last redraw (the horizontal chart may shrink it).
    pub(crate) fn rendered_plot(&self) -> Option<PlotSize> {
        self.state.borrow().rendered.as_ref().map(|r| r.plot)
    }

    pub(crate) fn redraw(&self, data: Vec<Datum>) -> Result<()> {
        if let Some(bad) = data.iter().find(|d| !d.value.is_finite()) {
            return Err(ChartError::NonFiniteValue { category: bad.category.clone() });
        }
        {
            let mut st = self.state.borrow_mut();
            st.cancel_auto_sort();
            st.container.clear();
            let rendered = st.build(data);
            log::debug!(
                "redrew {:?} bar chart under {} ({} bars)",
                st.orientation,
                st.container.selector(),
                rendered.data.len()
            );
            st.rendered = Some(rendered);
        }
        let control = self.wire_sort_control();
        self.schedule_auto_sort(control);
        Ok(())
    }

    pub(crate) fn sort(&self, by_value: bool) {
        self.state.borrow_mut().sort(by_value);
    }

    fn wire_sort_control(&self) -> Option<ToggleControl> {
        let (page, selector) = {
            let st = self.state.borrow();
            (st.page.clone(), st.config.sort_checkbox.clone()?)
        };
        let Some(control) = page.toggle(&selector) else {
            log::warn!("sort control `{selector}` not found; sorting is disabled");
            return None;
        };
        let weak: Weak<RefCell<BarState>> = Rc::downgrade(&self.state);
        control.on_change(move |event| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().sort(event.checked);
            }
        });
        Some(control)
    }

    fn schedule_auto_sort(&self, control: Option<ToggleControl>) {
        let (page, delay) = {
            let st = self.state.borrow();
            match st.config.auto_sort_delay_ms {
                Some(delay) => (st.page.clone(), delay),
                None => return,
            }
        };
        let weak = Rc::downgrade(&self.state);
        let id = page.set_timeout(delay, move || {
            let Some(state) = weak.upgrade() else { return };
            state.borrow_mut().auto_sort = None;
            match control {
                Some(control) => control.activate(true),
                None => state.borrow_mut().sort(true),
            }
        });
        self.state.borrow_mut().auto_sort = Some(id);
    }
}

impl BarState {
    fn cancel_auto_sort(&mut self) {
        if let Some(id) = self.auto_sort.take() {
            self.page.clear_timeout(id);
        }
    }

    fn effective_plot(&self, len: usize) -> PlotSize {
        let mut plot = self.size;
        if self.orientation == Orientation::Horizontal {
            let max_bar = self.config.max_bar_height.unwrap_or(DEFAULT_MAX_BAR_HEIGHT);
            if (len as f64) * max_bar < plot.height {
                plot.height = len as f64 * max_bar + 20.0;
            }
        }
        plot
    }

    fn build(&self, data: Vec<Datum>) -> Rendered {
        let plot = self.effective_plot(data.len());
        let max = data.iter().map(|d| d.value).reduce(f64::max).unwrap_or(0.0);
        let categories = data.iter().map(|d| d.category.clone());
        let (band, value) = match self.orientation {
            Orientation::Vertical => (
                BandScale::new(categories, (0.0, plot.width), BAND_PADDING, BAND_OUTER_PADDING),
                LinearScale::new((0.0, max), (plot.height, 0.0)),
            ),
            Orientation::Horizontal => (
                BandScale::new(categories, (0.0, plot.height), BAND_PADDING, BAND_OUTER_PADDING),
                LinearScale::new((0.0, max), (0.0, plot.width)),
            ),
        };

        let mut root = Group::new("plot").at(self.margin.left, self.margin.top);
        match self.orientation {
            Orientation::Vertical => self.vertical_axes(&mut root, &band, &value, plot),
            Orientation::Horizontal => self.horizontal_axes(&mut root, &band, &value, plot),
        }
        if let Some(title) = &self.config.title {
            let mut text = Text::new("chartTitle", title.clone())
                .at(plot.width / 2.0, -self.margin.top / 2.0)
                .anchored(Anchor::Middle)
                .sized(TITLE_FONT_SIZE);
            text.underline = true;
            root.push(text);
        }

        let padding = self.config.label_padding(&self.defaults);
        let mut colors = OrdinalColors::new(&BAR_PALETTE);
        for (i, d) in data.iter().enumerate() {
            let fill = if self.config.multiple_colors {
                bar_fill(&mut colors, i, &d.category)
            } else {
                BAR_PALETTE[0]
            };
            let start = band.map(&d.category).unwrap_or(0.0);
            let v = value.map(d.value);
            let rect = match self.orientation {
                Orientation::Vertical => Rect::new("bar", d.category.clone(), d.value)
                    .with_geometry(start, v, band.bandwidth(), plot.height - v),
                Orientation::Horizontal => Rect::new("bar", d.category.clone(), d.value)
                    .with_geometry(0.0, start, v, band.bandwidth()),
            };
            root.push(rect.with_fill(fill));
        }
        for d in &data {
            let start = band.map(&d.category).unwrap_or(0.0);
            let v = value.map(d.value);
            let (x, y) = match self.orientation {
                Orientation::Vertical => (start + band.bandwidth() / 2.0, v + padding),
                Orientation::Horizontal => (v + padding, start + band.bandwidth() / 2.0 + 5.0),
            };
            root.push(
                Text::new("valueLabel", format::number(d.value))
                    .keyed(d.category.clone())
                    .at(x, y)
                    .anchored(Anchor::Middle)
                    .sized(VALUE_LABEL_FONT_SIZE)
                    .filled(Color::BLACK),
            );
        }

        let (w, h) = plot.outer(&self.margin);
        let scene = self.container.append(Svg::new(w, h, root));
        Rendered { scene, data, band, value, plot }
    }

    fn rotate_category_labels(&self, band: &BandScale) -> bool {
        self.config.rotate_labels.unwrap_or_else(|| {
            let widest = band
                .domain()
                .iter()
                .map(|c| estimate_label_width(c, AXIS_FONT_SIZE))
                .fold(0.0, f64::max);
            widest > band.step()
        })
    }

    fn vertical_axes(&self, root: &mut Group, band: &BandScale, value: &LinearScale, plot: PlotSize) {
        let mut x_axis = Axis::new(Orient::Bottom);
        if self.rotate_category_labels(band) {
            let dx = self.config.text_dx.unwrap_or(DEFAULT_TEXT_DX_EM);
            x_axis = x_axis.with_label_style(TickLabelStyle::rotated(dx, 2.0));
        }
        root.push(x_axis.render("x axis", &Axis::band_ticks(band), band.range()).at(0.0, plot.height));

        let y_axis = Axis::new(Orient::Left);
        let mut y_group = y_axis.render("y axis", &y_axis.value_ticks(value), value.range());
        if let Some(label) = &self.config.y_axis_label {
            // rotate(-90) about the axis origin, then y=6: lands at (6, 0).
            y_group.push(
                Text::new("axisLabel", label.clone())
                    .at(6.0, 0.0)
                    .rotated(-90.0)
                    .offset_em(0.0, 0.71)
                    .anchored(Anchor::End),
            );
        }
        root.push(y_group);
    }

    fn horizontal_axes(&self, root: &mut Group, band: &BandScale, value: &LinearScale, plot: PlotSize) {
        let bottom = Axis::new(Orient::Bottom);
        let mut bottom_group = bottom.render("x axis", &bottom.value_ticks(value), value.range()).at(0.0, plot.height);
        let top = Axis::new(Orient::Top);
        let mut top_group = top.render("x axis", &top.value_ticks(value), value.range());
        if let Some(label) = &self.config.x_axis_label {
            bottom_group.push(
                Text::new("axisLabel", label.clone()).at(plot.width, 0.0).offset_em(0.0, -0.4).anchored(Anchor::End),
            );
            top_group.push(
                Text::new("axisLabel", label.clone()).at(plot.width, 0.0).offset_em(0.0, 1.0).anchored(Anchor::End),
            );
        }
        root.push(bottom_group);

        let y_axis = Axis::new(Orient::Left);
        let mut y_group = y_axis.render("y axis", &Axis::band_ticks(band), band.range());
        if let Some(label) = &self.config.y_axis_label {
            y_group.push(
                Text::new("axisLabel", label.clone())
                    .at(6.0, 0.0)
                    .rotated(-90.0)
                    .offset_em(0.0, 0.71)
                    .anchored(Anchor::End),
            );
        }
        root.push(y_group);
        root.push(top_group);
    }

    /// Reorder the rendered bars by value (descending) or by category (ascending)
    /// and tween everything on the band axis to its new slot.
    fn sort(&mut self, by_value: bool) {
        self.cancel_auto_sort();
        let now = self.page.now() as f64;
        let orientation = self.orientation;
        let Some(r) = self.rendered.as_mut() else { return };

        if by_value {
            r.data.sort_by(|a, b| b.value.total_cmp(&a.value));
        } else {
            r.data.sort_by(|a, b| a.category.cmp(&b.category));
        }
        r.band.set_domain(r.data.iter().map(|d| d.category.clone()));
        let band = r.band.clone();
        self.container.with_scene_mut(r.scene, |svg| retarget(&mut svg.root, &band, orientation, now));
        log::debug!(
            "sorted {} bars by {}",
            r.data.len(),
            if by_value { "value" } else { "category" }
        );
    }
}

fn rank(band: &BandScale, key: Option<&str>) -> usize {
    key.and_then(|k| band.index_of(k)).unwrap_or(usize::MAX)
}

fn retarget(root: &mut Group, band: &BandScale, orientation: Orientation, now: f64) {
    root.reorder_children("rect.bar", |n| rank(band, n.as_rect().map(|r| r.key.as_str())));
    root.reorder_children("text.valueLabel", |n| rank(band, n.as_text().and_then(|t| t.key.as_deref())));

    let half = band.bandwidth() / 2.0;
    let (mut bars, mut labels) = (0usize, 0usize);
    for child in root.children.iter_mut() {
        match child {
            Node::Rect(rect) if rect.class == "bar" => {
                let start = now + bars as f64 * SORT_STAGGER_MS;
                bars += 1;
                let Some(pos) = band.map(&rect.key) else { continue };
                match orientation {
                    Orientation::Vertical => rect.x.animate(pos, start, SORT_DURATION_MS),
                    Orientation::Horizontal => rect.y.animate(pos, start, SORT_DURATION_MS),
                }
            }
            Node::Text(text) if text.class == "valueLabel" => {
                let start = now + labels as f64 * SORT_STAGGER_MS;
                labels += 1;
                text.fill = Color::BLACK;
                let Some(pos) = text.key.as_deref().and_then(|k| band.map(k)) else { continue };
                match orientation {
                    Orientation::Vertical => text.x.animate(pos + half, start, SORT_DURATION_MS),
                    Orientation::Horizontal => text.y.animate(pos + half + 5.0, start, SORT_DURATION_MS),
                }
            }
            _ => {}
        }
    }

    let selector = match orientation {
        Orientation::Vertical => "g.x.axis",
        Orientation::Horizontal => "g.y.axis",
    };
    let Some(axis) = root.find_group_mut(selector) else { return };
    axis.reorder_children("g.tick", |n| rank(band, n.as_group().and_then(|g| g.key.as_deref())));
    let mut ticks = 0usize;
    for child in axis.children.iter_mut() {
        let Node::Group(tick) = child else { continue };
        let start = now + ticks as f64 * SORT_STAGGER_MS;
        ticks += 1;
        let Some(center) = tick.key.as_deref().and_then(|k| band.center(k)) else { continue };
        match orientation {
            Orientation::Vertical => tick.translate.x.animate(center, start, SORT_DURATION_MS),
            Orientation::Horizontal => tick.translate.y.animate(center, start, SORT_DURATION_MS),
        }
    }
}
