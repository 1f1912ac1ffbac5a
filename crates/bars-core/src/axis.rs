// File: crates/bars-core/src/axis.rs
// Summary: Axis model producing tick groups, tick labels and the domain line.

use crate::format;
use crate::grid::DEFAULT_TICK_COUNT;
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Group, Line, Text};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Top,
    Bottom,
    Left,
}

impl Orient {
    fn is_horizontal(self) -> bool {
        matches!(self, Orient::Top | Orient::Bottom)
    }
}

/// One tick: datum key, pixel position along the axis, display label.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub key: String,
    pub position: f64,
    pub label: String,
}

/// Overrides for tick label placement (used for rotated category labels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickLabelStyle {
    pub rotate: f64,
    pub anchor: Anchor,
    pub dx_em: f64,
    pub dy_em: f64,
}

impl TickLabelStyle {
    /// Labels rotated -65° and end-anchored so long categories read diagonally.
    pub fn rotated(dx_em: f64, dy_em: f64) -> Self {
        Self { rotate: -65.0, anchor: Anchor::End, dx_em, dy_em }
    }
}

#[derive(Clone, Debug)]
pub struct Axis {
    pub orient: Orient,
    pub tick_size: f64,
    pub tick_padding: f64,
    pub label_style: Option<TickLabelStyle>,
}

impl Axis {
    pub fn new(orient: Orient) -> Self {
        Self { orient, tick_size: 6.0, tick_padding: 3.0, label_style: None }
    }

    pub fn with_tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }

    pub fn with_tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    pub fn with_label_style(mut self, style: TickLabelStyle) -> Self {
        self.label_style = Some(style);
        self
    }

    /// One tick per category, positioned at the band centre.
    pub fn band_ticks(scale: &BandScale) -> Vec<Tick> {
        scale
            .domain()
            .iter()
            .filter_map(|c| {
                scale.center(c).map(|position| Tick { key: c.clone(), position, label: c.clone() })
            })
            .collect()
    }

    /// Nice ticks across the value domain, labelled with the integer format.
    pub fn value_ticks(&self, scale: &LinearScale) -> Vec<Tick> {
        scale
            .ticks(DEFAULT_TICK_COUNT)
            .into_iter()
            .map(|v| Tick { key: format::number(v), position: scale.map(v), label: format::integer(v) })
            .collect()
    }

    /// Build the axis group: the domain line spanning `range` plus one group per tick.
    pub fn render(&self, class: &str, ticks: &[Tick], range: (f64, f64)) -> Group {
        let mut g = Group::new(class);
        let (r0, r1) = range;
        let domain = if self.orient.is_horizontal() {
            Line::new("domain", r0, 0.0, r1, 0.0)
        } else {
            Line::new("domain", 0.0, r0, 0.0, r1)
        };
        g.push(domain);
        for tick in ticks {
            g.push(self.tick_group(tick));
        }
        g
    }

    pub fn tick_group(&self, tick: &Tick) -> Group {
        let (tx, ty) = if self.orient.is_horizontal() { (tick.position, 0.0) } else { (0.0, tick.position) };
        let mut g = Group::new("tick").at(tx, ty);
        g.key = Some(tick.key.clone());

        let inner = self.tick_size.max(0.0) + self.tick_padding;
        let (line, text) = match self.orient {
            Orient::Bottom => (
                Line::new("", 0.0, 0.0, 0.0, self.tick_size),
                Text::new("", tick.label.clone()).at(0.0, inner).offset_em(0.0, 0.71).anchored(Anchor::Middle),
            ),
            Orient::Top => (
                Line::new("", 0.0, 0.0, 0.0, -self.tick_size),
                Text::new("", tick.label.clone()).at(0.0, -inner).anchored(Anchor::Middle),
            ),
            Orient::Left => (
                Line::new("", 0.0, 0.0, -self.tick_size, 0.0),
                Text::new("", tick.label.clone()).at(-inner, 0.0).offset_em(0.0, 0.32).anchored(Anchor::End),
            ),
        };
        let text = match self.label_style {
            // svg rotates tick labels about the tick origin; our text rotates about
            // its own position, so move the position onto the rotated frame first.
            Some(style) => {
                let (x, y) = rotate_point(text.x.target(), text.y.target(), style.rotate);
                text.at(x, y).anchored(style.anchor).offset_em(style.dx_em, style.dy_em).rotated(style.rotate)
            }
            None => text,
        };
        g.push(line);
        g.push(text.keyed(tick.key.clone()));
        g
    }
}

fn rotate_point(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Rough rendered width of `label` at `font_size`, for layout decisions made
/// before any text is shaped.
pub fn estimate_label_width(label: &str, font_size: f64) -> f64 {
    label.chars().count() as f64 * font_size * 0.6
}
