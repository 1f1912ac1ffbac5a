// File: crates/bars-render-skia/src/theme.rs
// Summary: Page colors used around the scene (background, strokes, tooltip box).

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    /// Axis domain lines and tick marks.
    pub stroke: skia::Color,
    pub tooltip_background: skia::Color,
    pub tooltip_text: skia::Color,
}

impl Theme {
    /// White page, black strokes, the usual look of the charts in a browser.
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            stroke: skia::Color::from_argb(255, 0, 0, 0),
            tooltip_background: skia::Color::from_argb(204, 0, 0, 0),
            tooltip_text: skia::Color::from_argb(255, 255, 255, 255),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            stroke: skia::Color::from_argb(255, 180, 180, 190),
            tooltip_background: skia::Color::from_argb(230, 235, 235, 245),
            tooltip_text: skia::Color::from_argb(255, 18, 18, 20),
        }
    }
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    [Theme::light(), Theme::dark()]
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::light)
}
