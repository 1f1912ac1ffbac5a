// File: crates/bars-core/src/scene.rs
// Summary: Retained scene tree (svg-shaped) built by the chart components.
// Notes:
// - Positional attributes are `Tweened` so transitions can be scheduled on them;
//   readers sample them against the page clock.
// - Selection supports one compound selector: an optional tag followed by
//   `.class` tokens, e.g. `rect.bar`, `.valueLabel`, `g.y.axis`.

use std::fmt::Write as _;

use crate::geometry::RectF;
use crate::palette::Color;
use crate::tween::Tweened;

/// Identifier of a rendered scene inside its container.
pub type SceneId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Translate {
    pub x: Tweened,
    pub y: Tweened,
}

impl Translate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: Tweened::new(x), y: Tweened::new(y) }
    }
}

impl Default for Translate {
    fn default() -> Self { Self::new(0.0, 0.0) }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub class: String,
    /// Datum key bound to this group (e.g. a tick's category).
    pub key: Option<String>,
    pub translate: Translate,
    /// Inherited fill for descendants without their own.
    pub fill: Option<Color>,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into(), ..Self::default() }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.translate = Translate::new(x, y);
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// First descendant group (depth first, self excluded) matching `selector`.
    pub fn find_group_mut(&mut self, selector: &str) -> Option<&mut Group> {
        let sel = Selector::parse(selector);
        find_group_mut(self, &sel)
    }

    pub fn find_group(&self, selector: &str) -> Option<&Group> {
        let sel = Selector::parse(selector);
        self.children.iter().find_map(|n| match n {
            Node::Group(g) if sel.matches(n) => Some(g),
            Node::Group(g) => g.find_group(selector),
            _ => None,
        })
    }

    /// All descendants (depth first, document order) matching `selector`.
    pub fn select_all(&self, selector: &str) -> Vec<&Node> {
        let sel = Selector::parse(selector);
        let mut out = Vec::new();
        collect(self, &sel, &mut out);
        out
    }

    /// Stable reorder of the direct children matching `selector` by `rank`,
    /// keeping them in the slots they already occupy.
    pub fn reorder_children<F>(&mut self, selector: &str, mut rank: F)
    where
        F: FnMut(&Node) -> usize,
    {
        let sel = Selector::parse(selector);
        let slots: Vec<usize> = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| sel.matches(n))
            .map(|(i, _)| i)
            .collect();
        let mut picked: Vec<(usize, Node)> = slots
            .iter()
            .map(|&i| {
                let node = std::mem::replace(&mut self.children[i], Node::Group(Group::default()));
                (rank(&node), node)
            })
            .collect();
        picked.sort_by_key(|(r, _)| *r);
        for (slot, (_, node)) in slots.into_iter().zip(picked) {
            self.children[slot] = node;
        }
    }
}

fn find_group_mut<'a>(g: &'a mut Group, sel: &Selector) -> Option<&'a mut Group> {
    for child in g.children.iter_mut() {
        let hit = sel.matches(child);
        if let Node::Group(inner) = child {
            if hit {
                return Some(inner);
            }
            if let Some(found) = find_group_mut(inner, sel) {
                return Some(found);
            }
        }
    }
    None
}

fn collect<'a>(g: &'a Group, sel: &Selector, out: &mut Vec<&'a Node>) {
    for child in &g.children {
        if sel.matches(child) {
            out.push(child);
        }
        if let Node::Group(inner) = child {
            collect(inner, sel, out);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub class: String,
    /// Category bound to this rect.
    pub key: String,
    /// Value bound to this rect (shown by tooltips).
    pub value: f64,
    pub x: Tweened,
    pub y: Tweened,
    pub width: Tweened,
    pub height: Tweened,
    pub fill: Option<Color>,
}

impl Rect {
    pub fn new(class: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self {
            class: class.into(),
            key: key.into(),
            value,
            x: Tweened::new(0.0),
            y: Tweened::new(0.0),
            width: Tweened::new(0.0),
            height: Tweened::new(0.0),
            fill: None,
        }
    }

    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x.set(x);
        self.y.set(y);
        self.width.set(width);
        self.height.set(height);
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Geometry at clock time `t`.
    pub fn bounds_at(&self, t: f64) -> RectF {
        RectF::from_ltwh(self.x.at(t), self.y.at(t), self.width.at(t), self.height.at(t))
    }

    /// Geometry once every scheduled transition has completed.
    pub fn final_bounds(&self) -> RectF {
        RectF::from_ltwh(self.x.target(), self.y.target(), self.width.target(), self.height.target())
    }

    /// Cancel transitions on every attribute at time `t`.
    pub fn interrupt(&mut self, t: f64) {
        for attr in [&mut self.x, &mut self.y, &mut self.width, &mut self.height] {
            attr.interrupt(t);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub class: String,
    pub key: Option<String>,
    pub x: Tweened,
    pub y: Tweened,
    /// Offsets in em, applied after rotation like svg `dx`/`dy`.
    pub dx_em: f64,
    pub dy_em: f64,
    /// Rotation in degrees about the text origin.
    pub rotate: f64,
    pub anchor: Anchor,
    pub font_size: f64,
    pub fill: Color,
    pub underline: bool,
    pub content: String,
}

impl Text {
    pub fn new(class: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            key: None,
            x: Tweened::new(0.0),
            y: Tweened::new(0.0),
            dx_em: 0.0,
            dy_em: 0.0,
            rotate: 0.0,
            anchor: Anchor::Start,
            font_size: 10.0,
            fill: Color::BLACK,
            underline: false,
            content: content.into(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x.set(x);
        self.y.set(y);
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn offset_em(mut self, dx: f64, dy: f64) -> Self {
        self.dx_em = dx;
        self.dy_em = dy;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn sized(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn filled(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub class: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Color,
}

impl Line {
    pub fn new(class: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { class: class.into(), x1, y1, x2, y2, stroke: Color::BLACK }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Group(Group),
    Rect(Rect),
    Text(Text),
    Line(Line),
}

impl Node {
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Group(_) => "g",
            Node::Rect(_) => "rect",
            Node::Text(_) => "text",
            Node::Line(_) => "line",
        }
    }

    pub fn class(&self) -> &str {
        match self {
            Node::Group(g) => &g.class,
            Node::Rect(r) => &r.class,
            Node::Text(t) => &t.class,
            Node::Line(l) => &l.class,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self { Node::Rect(r) => Some(r), _ => None }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self { Node::Text(t) => Some(t), _ => None }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self { Node::Group(g) => Some(g), _ => None }
    }
}

impl From<Group> for Node { fn from(v: Group) -> Self { Node::Group(v) } }
impl From<Rect> for Node { fn from(v: Rect) -> Self { Node::Rect(v) } }
impl From<Text> for Node { fn from(v: Text) -> Self { Node::Text(v) } }
impl From<Line> for Node { fn from(v: Line) -> Self { Node::Line(v) } }

struct Selector<'a> {
    tag: Option<&'a str>,
    classes: Vec<&'a str>,
}

impl<'a> Selector<'a> {
    fn parse(s: &'a str) -> Self {
        let mut parts = s.trim().split('.');
        let tag = parts.next().filter(|t| !t.is_empty());
        Self { tag, classes: parts.filter(|c| !c.is_empty()).collect() }
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = self.tag {
            if tag != node.tag() {
                return false;
            }
        }
        let class = node.class();
        self.classes.iter().all(|want| class.split_whitespace().any(|c| c == *want))
    }
}

/// Hover tooltip shown above a bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Anchor point in svg coordinates (top centre of the hovered bar).
    pub x: f64,
    pub y: f64,
}

/// One rendered chart: the root `<svg>` element under a mount point.
#[derive(Clone, Debug, PartialEq)]
pub struct Svg {
    pub id: SceneId,
    pub width: f64,
    pub height: f64,
    /// Plot group, translated by the chart margins.
    pub root: Group,
    pub tooltip: Option<Tooltip>,
}

impl Svg {
    pub fn new(width: f64, height: f64, root: Group) -> Self {
        Self { id: 0, width, height, root, tooltip: None }
    }

    pub fn select_all(&self, selector: &str) -> Vec<&Node> {
        self.root.select_all(selector)
    }

    pub fn rects(&self, selector: &str) -> Vec<&Rect> {
        self.select_all(selector).into_iter().filter_map(Node::as_rect).collect()
    }

    pub fn texts(&self, selector: &str) -> Vec<&Text> {
        self.select_all(selector).into_iter().filter_map(Node::as_text).collect()
    }

    /// Static svg markup of the scene sampled at clock time `t`.
    pub fn to_svg_string(&self, t: f64) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="sans-serif">"#,
            self.width, self.height
        );
        write_group(&mut out, &self.root, t, 1);
        if let Some(tip) = &self.tooltip {
            let _ = writeln!(
                out,
                r#"  <text class="tooltip" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                tip.x,
                tip.y - 6.0,
                escape(&tip.text)
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

fn write_group(out: &mut String, g: &Group, t: f64, depth: usize) {
    let pad = "  ".repeat(depth);
    let fill = g.fill.map(|c| format!(r#" fill="{c}""#)).unwrap_or_default();
    let _ = writeln!(
        out,
        r#"{pad}<g class="{}" transform="translate({:.2},{:.2})"{fill}>"#,
        g.class,
        g.translate.x.at(t),
        g.translate.y.at(t)
    );
    for child in &g.children {
        match child {
            Node::Group(inner) => write_group(out, inner, t, depth + 1),
            Node::Rect(r) => {
                let b = r.bounds_at(t);
                let fill = r.fill.map(|c| format!(r#" fill="{c}""#)).unwrap_or_default();
                let _ = writeln!(
                    out,
                    r#"{pad}  <rect class="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{fill}/>"#,
                    r.class,
                    b.left,
                    b.top,
                    b.width().max(0.0),
                    b.height().max(0.0)
                );
            }
            Node::Text(tx) => {
                let (x, y) = (tx.x.at(t), tx.y.at(t));
                let rotate = if tx.rotate != 0.0 {
                    format!(r#" transform="rotate({} {:.2} {:.2})""#, tx.rotate, x, y)
                } else {
                    String::new()
                };
                let deco = if tx.underline { r#" text-decoration="underline""# } else { "" };
                let _ = writeln!(
                    out,
                    r#"{pad}  <text class="{}" x="{:.2}" y="{:.2}" dx="{}em" dy="{}em" text-anchor="{}" font-size="{}" fill="{}"{rotate}{deco}>{}</text>"#,
                    tx.class,
                    x,
                    y,
                    tx.dx_em,
                    tx.dy_em,
                    tx.anchor.as_svg(),
                    tx.font_size,
                    tx.fill,
                    escape(&tx.content)
                );
            }
            Node::Line(l) => {
                let _ = writeln!(
                    out,
                    r#"{pad}  <line class="{}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
                    l.class, l.x1, l.y1, l.x2, l.y2, l.stroke
                );
            }
        }
    }
    let _ = writeln!(out, "{pad}</g>");
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
