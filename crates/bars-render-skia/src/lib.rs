// File: crates/bars-render-skia/src/lib.rs
// Summary: Headless PNG rendering of bars-core scenes using Skia CPU raster surfaces.
// Notes:
// - Tweened attributes are sampled at the time passed in, so a frame mid-transition
//   renders exactly what the page shows at that moment.
// - Negative widths/heights draw nothing, as in svg.

pub mod text;
pub mod theme;

use anyhow::Result;
use bars_core::{Anchor, Color, Group, Node, Svg, Tooltip};
use skia_safe as skia;

pub use text::TextShaper;
pub use theme::Theme;

pub struct RenderOptions {
    pub theme: Theme,
    /// Glyphs vary across platforms; snapshot tests turn them off.
    pub draw_text: bool,
    /// Device pixels per scene pixel.
    pub scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { theme: Theme::light(), draw_text: true, scale: 1.0 }
    }
}

fn to_skia(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

pub struct SkiaRenderer {
    shaper: TextShaper,
}

impl Default for SkiaRenderer {
    fn default() -> Self { Self::new() }
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { shaper: TextShaper::new() }
    }

    /// Render `svg` as it looks at clock time `t` and encode it as PNG.
    pub fn render_png_bytes(&self, svg: &Svg, t: f64, opts: &RenderOptions) -> Result<Vec<u8>> {
        let width = (svg.width as f32 * opts.scale).ceil() as i32;
        let height = (svg.height as f32 * opts.scale).ceil() as i32;
        if width <= 0 || height <= 0 {
            anyhow::bail!("scene has no drawable area ({width}x{height})");
        }
        let mut surface = skia::surfaces::raster_n32_premul((width, height))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(opts.theme.background);
        canvas.scale((opts.scale, opts.scale));

        self.draw_group(canvas, &svg.root, t, None, opts);
        if let Some(tip) = &svg.tooltip {
            if opts.draw_text {
                self.draw_tooltip(canvas, tip, opts);
            }
        }

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        log::debug!("rendered scene {} at t={t} to {width}x{height} PNG ({} bytes)", svg.id, data.as_bytes().len());
        Ok(data.as_bytes().to_vec())
    }

    /// Render to a PNG file at `output_png_path`, creating parent directories.
    pub fn render_to_png(
        &self,
        svg: &Svg,
        t: f64,
        opts: &RenderOptions,
        output_png_path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let bytes = self.render_png_bytes(svg, t, opts)?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, bytes)?;
        Ok(())
    }

    fn draw_group(&self, canvas: &skia::Canvas, g: &Group, t: f64, inherited: Option<Color>, opts: &RenderOptions) {
        let fill = g.fill.or(inherited);
        canvas.save();
        canvas.translate((g.translate.x.at(t) as f32, g.translate.y.at(t) as f32));
        for child in &g.children {
            match child {
                Node::Group(inner) => self.draw_group(canvas, inner, t, fill, opts),
                Node::Rect(r) => {
                    let b = r.bounds_at(t);
                    if b.width() <= 0.0 || b.height() <= 0.0 {
                        continue;
                    }
                    let mut paint = skia::Paint::default();
                    paint.set_anti_alias(true);
                    paint.set_style(skia::paint::Style::Fill);
                    paint.set_color(to_skia(r.fill.or(fill).unwrap_or(Color::BLACK)));
                    let rect = skia::Rect::from_ltrb(b.left as f32, b.top as f32, b.right as f32, b.bottom as f32);
                    canvas.draw_rect(rect, &paint);
                }
                Node::Line(l) => {
                    let mut paint = skia::Paint::default();
                    // crisp edges, like `shape-rendering: crispEdges` on axis paths
                    paint.set_anti_alias(false);
                    paint.set_stroke_width(1.0);
                    paint.set_color(if l.stroke == Color::BLACK { opts.theme.stroke } else { to_skia(l.stroke) });
                    canvas.draw_line((l.x1 as f32, l.y1 as f32), (l.x2 as f32, l.y2 as f32), &paint);
                }
                Node::Text(tx) if opts.draw_text => {
                    let size = tx.font_size as f32;
                    canvas.save();
                    canvas.translate((tx.x.at(t) as f32, tx.y.at(t) as f32));
                    if tx.rotate != 0.0 {
                        canvas.rotate(tx.rotate as f32, None);
                    }
                    self.shaper.draw_anchored(
                        canvas,
                        &tx.content,
                        tx.dx_em as f32 * size,
                        tx.dy_em as f32 * size,
                        size,
                        to_skia(tx.fill),
                        tx.anchor,
                        tx.underline,
                    );
                    canvas.restore();
                }
                Node::Text(_) => {}
            }
        }
        canvas.restore();
    }

    fn draw_tooltip(&self, canvas: &skia::Canvas, tip: &Tooltip, opts: &RenderOptions) {
        const SIZE: f32 = 12.0;
        const PAD: f32 = 8.0;
        let width = self.shaper.measure_width(&tip.text, SIZE) + PAD * 2.0;
        let height = SIZE + PAD * 2.0;
        // Box sits centred above the anchor with a small gap.
        let (cx, bottom) = (tip.x as f32, tip.y as f32 - 6.0);
        let rect = skia::Rect::from_xywh(cx - width * 0.5, bottom - height, width, height);
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(opts.theme.tooltip_background);
        canvas.draw_round_rect(rect, 2.0, 2.0, &paint);
        self.shaper.draw_anchored(
            canvas,
            &tip.text,
            cx,
            bottom - PAD - SIZE * 0.2,
            SIZE,
            opts.theme.tooltip_text,
            Anchor::Middle,
            false,
        );
    }
}
